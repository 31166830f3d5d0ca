//! Small deterministic environments with known solutions.
#![allow(dead_code)]
use anyhow::{bail, Result};
use tdrl_core::{record::Record, DiscreteAct, Env, ObservationSpace, Step, VecObs};

/// Two states `A` (observed as 0) and `B` (observed as 1), two actions.
///
/// * In `A`, action 0 ends the episode with reward 1, action 1 moves to `B` with reward 0.
/// * In `B`, action 0 ends the episode with reward 0, action 1 with reward 5.
///
/// With a discount factor below 1 and above 0.2 the optimal greedy action is 1 in both
/// states.
pub struct TwoStates {
    pos: usize,
}

impl Env for TwoStates {
    type Config = ();
    type Obs = VecObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self { pos: 0 })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let (pos, reward, is_terminated) = match (self.pos, a.0) {
            (0, 0) => (0, 1.0, true),
            (0, 1) => (1, 0.0, false),
            (1, 0) => (1, 0.0, true),
            (1, 1) => (1, 5.0, true),
            (p, a) => bail!("invalid action {} in state {}", a, p),
        };
        self.pos = pos;
        let obs = VecObs(vec![pos as f64]);
        Ok((Step::new(obs, *a, reward, is_terminated, false, ()), Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.pos = 0;
        Ok(VecObs(vec![0.0]))
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn action_space(&self) -> usize {
        2
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::from_bounds(&[(0.0, 1.0)])
    }
}

/// Walks right from 0 to `LEN` whatever the action, reward -1 per step.
///
/// Undiscounted, the value of position `p` is `p - LEN`.
pub struct Corridor {
    pos: usize,
}

impl Corridor {
    pub const LEN: usize = 3;
}

impl Env for Corridor {
    type Config = ();
    type Obs = VecObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self { pos: 0 })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.pos += 1;
        let obs = VecObs(vec![self.pos as f64]);
        let is_terminated = self.pos == Self::LEN;
        Ok((Step::new(obs, *a, -1.0, is_terminated, false, ()), Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.pos = 0;
        Ok(VecObs(vec![0.0]))
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn action_space(&self) -> usize {
        1
    }

    fn observation_space(&self) -> ObservationSpace {
        ObservationSpace::from_bounds(&[(0.0, Self::LEN as f64)])
    }
}
