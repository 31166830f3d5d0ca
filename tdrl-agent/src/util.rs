//! Utilities shared by agents.
use anyhow::Result;
use tdrl_core::{error::TdrlError, Discretizer, Features, ObservationSpace};

/// Checks the discretizer and the number of actions against the environment.
pub(crate) fn check_space(
    discretizer: &Discretizer,
    n_actions_agent: usize,
    obs_space: &ObservationSpace,
    n_actions: usize,
) -> Result<()> {
    if discretizer.dim() != obs_space.dim() {
        return Err(TdrlError::Configuration(format!(
            "discretizer has {} dimensions, observations have {}",
            discretizer.dim(),
            obs_space.dim()
        ))
        .into());
    }
    if n_actions_agent != n_actions {
        return Err(TdrlError::Configuration(format!(
            "agent has {} actions, environment has {}",
            n_actions_agent, n_actions
        ))
        .into());
    }
    Ok(())
}

/// Checks the dimensionality of a feature map against the environment.
pub(crate) fn check_features<F: Features>(
    features: &F,
    obs_space: &ObservationSpace,
) -> Result<()> {
    if features.dim() != obs_space.dim() {
        return Err(TdrlError::Configuration(format!(
            "features read {} dimensions, observations have {}",
            features.dim(),
            obs_space.dim()
        ))
        .into());
    }
    Ok(())
}

/// Mean absolute TD error over an episode.
#[derive(Debug, Default, Clone)]
pub(crate) struct TdErrorMean {
    sum: f64,
    n: usize,
}

impl TdErrorMean {
    pub fn push(&mut self, delta: f64) {
        self.sum += delta.abs();
        self.n += 1;
    }

    /// Returns the mean and resets the accumulator.
    pub fn take(&mut self) -> Option<f32> {
        let mean = match self.n {
            0 => None,
            n => Some((self.sum / n as f64) as f32),
        };
        *self = Self::default();
        mean
    }
}
