//! Core functionalities.
mod agent;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use env::{Env, ObservationSpace};
pub use policy::Policy;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Tabular agents only look at the observation as an ordered tuple of real values.
pub trait Obs: Clone + Debug {
    /// Returns the values of the observation.
    fn as_slice(&self) -> &[f64];

    /// Returns the number of dimensions.
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

/// An action drawn from a finite action set `0..n`.
pub trait Act: Clone + Debug + From<usize> {
    /// Returns the index of the action.
    fn index(&self) -> usize;
}

/// Observation as a plain vector of values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VecObs(pub Vec<f64>);

impl Obs for VecObs {
    fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for VecObs {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

/// Discrete action given by its index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscreteAct(pub usize);

impl Act for DiscreteAct {
    fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for DiscreteAct {
    fn from(ix: usize) -> Self {
        Self(ix)
    }
}
