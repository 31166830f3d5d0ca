//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Per-dimension bounds of observations.
///
/// Unbounded dimensions use infinite values, as cart and pole velocities do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObservationSpace {
    /// Lower bounds.
    pub low: Vec<f64>,

    /// Upper bounds.
    pub high: Vec<f64>,
}

impl ObservationSpace {
    /// Constructs the space from `(low, high)` pairs.
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Self {
        Self {
            low: bounds.iter().map(|b| b.0).collect(),
            high: bounds.iter().map(|b| b.1).collect(),
        }
    }

    /// The number of dimensions of observations.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` if every value of `obs` lies within the bounds.
    pub fn contains(&self, obs: &[f64]) -> bool {
        obs.len() == self.dim()
            && obs
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

/// Represents an environment, typically an MDP.
///
/// Any error returned by [`Env::reset`] or [`Env::step`] is fatal for the run using the
/// environment.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Performs an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Resets the environment with a given index.
    ///
    /// The index is used as a random seed, so that evaluation runs see the same
    /// sequence of initial states.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;

    /// The number of discrete actions.
    fn action_space(&self) -> usize;

    /// Bounds of observations.
    fn observation_space(&self) -> ObservationSpace;
}
