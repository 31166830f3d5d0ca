//! Agent.
use super::{Env, ObservationSpace, Policy, Step};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// Represents a trainable policy on an environment.
///
/// The [`Trainer`](crate::Trainer) owns the interaction loop and calls the methods of
/// this trait at fixed points of an episode:
///
/// 1. [`begin_episode`](Agent::begin_episode) before the environment is reset,
/// 2. [`sample`](Policy::sample) and [`observe`](Agent::observe) for every step,
/// 3. [`end_episode`](Agent::end_episode) once the episode is done.
pub trait Agent<E: Env>: Policy<E> {
    /// Set the policy to training mode.
    fn train(&mut self);

    /// Set the policy to evaluation mode, acting greedily.
    fn eval(&mut self);

    /// Return if it is in training mode.
    fn is_train(&self) -> bool;

    /// Checks that the agent's state space fits the environment.
    #[allow(unused_variables)]
    fn check_space(&self, obs_space: &ObservationSpace, n_actions: usize) -> Result<()> {
        Ok(())
    }

    /// Called before the episode with index `episode` starts.
    #[allow(unused_variables)]
    fn begin_episode(&mut self, episode: usize) {}

    /// Observes the transition from `obs` by `step`.
    ///
    /// Step-wise methods apply their bootstrapped update here.
    fn observe(&mut self, obs: &E::Obs, step: &Step<E>) -> Result<Record>;

    /// Called when the episode is done.
    ///
    /// Trajectory-based methods apply their updates here. Exploration is annealed.
    fn end_episode(&mut self) -> Result<Record>;

    /// Current estimate of the value of the state of `obs`.
    fn value(&self, obs: &E::Obs) -> f64;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
