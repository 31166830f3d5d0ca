//! Cart-pole balancing.
use crate::util::{load_config, save_config};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, path::Path};
use tdrl_core::{record::Record, Act, DiscreteAct, Env, ObservationSpace, Step, VecObs};

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
const LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;
const X_THRESHOLD: f64 = 2.4;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * PI / 360.0;

/// Configuration of [`CartPole`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartPoleConfig {
    /// Episodes are truncated after this number of steps.
    pub max_steps: usize,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self { max_steps: 200 }
    }
}

impl CartPoleConfig {
    /// Sets the time limit.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Constructs [`CartPoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path, "CartPole")
    }

    /// Saves [`CartPoleConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_config(self, path, "CartPole")
    }
}

/// CartPole-v0.
///
/// The observation is `(x, x_dot, theta, theta_dot)`. Action 0 pushes the cart to the left,
/// action 1 to the right. Every step yields reward 1, including the one on which the pole
/// falls or the cart leaves the track.
pub struct CartPole {
    config: CartPoleConfig,
    state: [f64; 4],
    steps: usize,
    done: bool,
    rng: fastrand::Rng,
}

impl CartPole {
    fn obs(&self) -> VecObs {
        VecObs(self.state.to_vec())
    }

    fn initial_state(rng: &fastrand::Rng) -> [f64; 4] {
        let mut s = [0.0; 4];
        for v in s.iter_mut() {
            *v = rng.f64() * 0.1 - 0.05;
        }
        s
    }

    fn start(&mut self, state: [f64; 4]) -> VecObs {
        self.state = state;
        self.steps = 0;
        self.done = false;
        self.obs()
    }
}

impl Env for CartPole {
    type Config = CartPoleConfig;
    type Obs = VecObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            state: [0.0; 4],
            steps: 0,
            done: true,
            rng: fastrand::Rng::with_seed(seed as u64),
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if self.done {
            bail!("CartPole stepped after the end of an episode; call reset first");
        }
        let force = match a.index() {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            ix => bail!("invalid CartPole action {}", ix),
        };

        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
        self.steps += 1;

        let [x, _, theta, _] = self.state;
        let is_terminated = x.abs() > X_THRESHOLD || theta.abs() > THETA_THRESHOLD;
        let is_truncated = !is_terminated && self.steps >= self.config.max_steps;
        self.done = is_terminated || is_truncated;

        let step = Step::new(self.obs(), *a, 1.0, is_terminated, is_truncated, ());
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let state = Self::initial_state(&self.rng);
        Ok(self.start(state))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let state = Self::initial_state(&fastrand::Rng::with_seed(ix as u64));
        Ok(self.start(state))
    }

    fn action_space(&self) -> usize {
        2
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::from_bounds(&[
            (-2.0 * X_THRESHOLD, 2.0 * X_THRESHOLD),
            (f64::NEG_INFINITY, f64::INFINITY),
            (-2.0 * THETA_THRESHOLD, 2.0 * THETA_THRESHOLD),
            (f64::NEG_INFINITY, f64::INFINITY),
        ])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reset_is_near_upright() -> Result<()> {
        let mut env = CartPole::build(&CartPoleConfig::default(), 42)?;
        for _ in 0..100 {
            let obs = env.reset()?;
            assert!(obs.0.iter().all(|v| v.abs() <= 0.05));
        }
        Ok(())
    }

    #[test]
    fn test_pushing_one_way_topples_the_pole() -> Result<()> {
        let mut env = CartPole::build(&CartPoleConfig::default(), 42)?;
        env.reset()?;
        let mut n_steps = 0;
        loop {
            let (step, _) = env.step(&DiscreteAct(1))?;
            n_steps += 1;
            assert_eq!(step.reward, 1.0);
            if step.is_done() {
                assert!(step.is_terminated);
                assert!(!step.is_truncated);
                break;
            }
        }
        assert!(n_steps < 50);
        assert!(env.step(&DiscreteAct(1)).is_err());
        Ok(())
    }

    #[test]
    fn test_time_limit_truncates() -> Result<()> {
        let config = CartPoleConfig::default().max_steps(3);
        let mut env = CartPole::build(&config, 0)?;
        env.reset_with_index(0)?;
        let mut a = 0;
        let mut last = None;
        for _ in 0..3 {
            let (step, _) = env.step(&DiscreteAct(a))?;
            a = 1 - a;
            last = Some((step.is_terminated, step.is_truncated));
        }
        assert_eq!(last, Some((false, true)));
        Ok(())
    }

    #[test]
    fn test_reset_with_index_is_reproducible() -> Result<()> {
        let mut env = CartPole::build(&CartPoleConfig::default(), 1)?;
        let obs1 = env.reset_with_index(7)?;
        env.reset()?;
        let obs2 = env.reset_with_index(7)?;
        assert_eq!(obs1, obs2);
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = CartPole::build(&CartPoleConfig::default(), 1)?;
        env.reset()?;
        assert!(env.step(&DiscreteAct(2)).is_err());
        Ok(())
    }
}
