//! Policy.
use super::Env;

/// Maps observations to actions.
///
/// Control agents sample epsilon-greedily from their value table while training and
/// greedily in evaluation mode; prediction agents follow a fixed rule.
pub trait Policy<E: Env> {
    /// Chooses an action for the observation.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;
}
