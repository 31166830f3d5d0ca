//! Default implementation of the [`Evaluator`] trait.
//!
//! This module provides a simple evaluator that runs a fixed number of episodes
//! and calculates the average return across all episodes.
use super::Evaluator;
use crate::{error::TdrlError, record::Record, Agent, Env};
use anyhow::Result;

/// Runs a fixed number of episodes and reports the average return as
/// `"episode_return"`.
///
/// Episode `i` starts from [`Env::reset_with_index`] with index `i`, so successive
/// evaluations see the same initial states.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<CartPole>::new(&CartPoleConfig::default(), 42, 10)?;
/// agent.eval();
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Average return: {}", record.get_scalar("episode_return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<A: Agent<E>>(&mut self, policy: &mut A) -> Result<Record> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self
                .env
                .reset_with_index(ix)
                .map_err(|e| TdrlError::env_failure("reset", e))?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self
                    .env
                    .step(&act)
                    .map_err(|e| TdrlError::env_failure("step", e))?;
                r_total += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        let n = self.n_episodes.max(1) as f32;
        Ok(Record::from_scalar("episode_return", r_total / n))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`] with its own environment.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }
}
