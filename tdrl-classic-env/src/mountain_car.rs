//! Mountain car.
use crate::util::{load_config, save_config};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tdrl_core::{record::Record, Act, DiscreteAct, Env, ObservationSpace, Step, VecObs};

const MIN_POSITION: f64 = -1.2;
const MAX_POSITION: f64 = 0.6;
const MAX_SPEED: f64 = 0.07;
const GOAL_POSITION: f64 = 0.5;
const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

/// Configuration of [`MountainCar`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountainCarConfig {
    /// Episodes are truncated after this number of steps.
    pub max_steps: usize,
}

impl Default for MountainCarConfig {
    fn default() -> Self {
        Self { max_steps: 200 }
    }
}

impl MountainCarConfig {
    /// Sets the time limit.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Constructs [`MountainCarConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_config(path, "MountainCar")
    }

    /// Saves [`MountainCarConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_config(self, path, "MountainCar")
    }
}

/// MountainCar-v0.
///
/// The observation is `(position, velocity)`. Actions 0, 1 and 2 push left, do nothing and
/// push right. Reward is -1 per step; the episode terminates once the car reaches
/// position 0.5.
pub struct MountainCar {
    config: MountainCarConfig,
    position: f64,
    velocity: f64,
    steps: usize,
    done: bool,
    rng: fastrand::Rng,
}

impl MountainCar {
    fn obs(&self) -> VecObs {
        VecObs(vec![self.position, self.velocity])
    }

    fn initial_position(rng: &fastrand::Rng) -> f64 {
        -0.6 + 0.2 * rng.f64()
    }

    fn start(&mut self, position: f64) -> VecObs {
        self.position = position;
        self.velocity = 0.0;
        self.steps = 0;
        self.done = false;
        self.obs()
    }
}

impl Env for MountainCar {
    type Config = MountainCarConfig;
    type Obs = VecObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            position: -0.5,
            velocity: 0.0,
            steps: 0,
            done: true,
            rng: fastrand::Rng::with_seed(seed as u64),
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if self.done {
            bail!("MountainCar stepped after the end of an episode; call reset first");
        }
        let push = match a.index() {
            ix @ 0..=2 => ix as f64 - 1.0,
            ix => bail!("invalid MountainCar action {}", ix),
        };

        self.velocity += push * FORCE - (3.0 * self.position).cos() * GRAVITY;
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position += self.velocity;
        self.position = self.position.clamp(MIN_POSITION, MAX_POSITION);
        if self.position == MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        self.steps += 1;

        let is_terminated = self.position >= GOAL_POSITION;
        let is_truncated = !is_terminated && self.steps >= self.config.max_steps;
        self.done = is_terminated || is_truncated;

        let step = Step::new(self.obs(), *a, -1.0, is_terminated, is_truncated, ());
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        let position = Self::initial_position(&self.rng);
        Ok(self.start(position))
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        let position = Self::initial_position(&fastrand::Rng::with_seed(ix as u64));
        Ok(self.start(position))
    }

    fn action_space(&self) -> usize {
        3
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::from_bounds(&[(MIN_POSITION, MAX_POSITION), (-MAX_SPEED, MAX_SPEED)])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    fn run(
        env: &mut MountainCar,
        policy: impl Fn(&VecObs) -> usize,
    ) -> Result<(usize, Step<MountainCar>)> {
        let mut obs = env.reset_with_index(0)?;
        let mut n_steps = 0;
        loop {
            let (step, _) = env.step(&DiscreteAct(policy(&obs)))?;
            n_steps += 1;
            if step.is_done() {
                return Ok((n_steps, step));
            }
            obs = step.obs.clone();
        }
    }

    #[test]
    fn test_idle_car_is_truncated() -> Result<()> {
        let mut env = MountainCar::build(&MountainCarConfig::default(), 0)?;
        let (n_steps, step) = run(&mut env, |_| 1)?;
        assert_eq!(n_steps, 200);
        assert!(step.is_truncated);
        assert!(!step.is_terminated);
        assert_eq!(step.reward, -1.0);
        Ok(())
    }

    #[test]
    fn test_pushing_with_velocity_reaches_goal() -> Result<()> {
        let mut env = MountainCar::build(&MountainCarConfig::default(), 0)?;
        let (n_steps, step) = run(&mut env, |obs| if obs.0[1] < 0.0 { 0 } else { 2 })?;
        assert!(step.is_terminated);
        assert!(n_steps < 200);
        assert!(step.obs.0[0] >= GOAL_POSITION);
        Ok(())
    }

    #[test]
    fn test_observations_stay_in_bounds() -> Result<()> {
        let mut env = MountainCar::build(&MountainCarConfig::default().max_steps(500), 3)?;
        let space = env.observation_space();
        env.reset()?;
        for _ in 0..500 {
            let (step, _) = env.step(&DiscreteAct(0))?;
            assert!(space.contains(&step.obs.0));
            if step.is_done() {
                break;
            }
        }
        Ok(())
    }

    #[test]
    fn test_serde_mountain_car_config() -> Result<()> {
        let config = MountainCarConfig::default().max_steps(1000);
        let dir = TempDir::new("mountain_car_config")?;
        let path = dir.path().join("mountain_car.yaml");
        config.save(&path)?;
        assert_eq!(MountainCarConfig::load(&path)?, config);
        Ok(())
    }
}
