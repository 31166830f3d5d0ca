//! Gradient Monte Carlo prediction.
use super::{FixedPolicy, PredictionConfig};
use crate::{util::check_features, LearningRate};
use anyhow::Result;
use std::{marker::PhantomData, path::Path};
use tdrl_core::{
    record::{Record, RecordValue},
    Agent, Env, Features, LinearValue, Obs, ObservationSpace, Policy, Step, Trajectory,
};

/// First-visit gradient Monte Carlo evaluation of a fixed policy.
///
/// With one-hot features of aggregated states, like those of a
/// [`Discretizer`](tdrl_core::Discretizer), this is Monte Carlo prediction by state
/// aggregation. Updates are applied when an episode ends, the first occurrence of every
/// feature set being moved towards its return.
pub struct McPrediction<E: Env, F: Features> {
    features: F,
    v: LinearValue,
    policy: FixedPolicy,
    trajectory: Trajectory<Vec<usize>>,
    discount_factor: f64,
    lr: LearningRate,
    train: bool,
    phantom: PhantomData<E>,
}

impl<E: Env, F: Features> McPrediction<E, F> {
    /// Constructs the agent with zero weights.
    pub fn build(config: PredictionConfig, features: F, policy: FixedPolicy) -> Self {
        let v = LinearValue::new(features.n_features());
        Self {
            features,
            v,
            policy,
            trajectory: Trajectory::new(),
            discount_factor: config.discount_factor,
            lr: config.lr,
            train: true,
            phantom: PhantomData,
        }
    }

    /// The value function.
    pub fn v(&self) -> &LinearValue {
        &self.v
    }
}

impl<E: Env, F: Features> Policy<E> for McPrediction<E, F> {
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        (self.policy)(obs.as_slice()).into()
    }
}

impl<E: Env, F: Features> Agent<E> for McPrediction<E, F> {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn check_space(&self, obs_space: &ObservationSpace, _n_actions: usize) -> Result<()> {
        check_features(&self.features, obs_space)
    }

    fn begin_episode(&mut self, episode: usize) {
        self.trajectory.clear();
        if self.train {
            self.lr.on_episode(episode);
        }
    }

    fn observe(&mut self, obs: &E::Obs, step: &Step<E>) -> Result<Record> {
        if self.train {
            let x = self.features.active(obs.as_slice());
            self.trajectory.push(x, step.reward as f64);
        }
        Ok(Record::empty())
    }

    fn end_episode(&mut self) -> Result<Record> {
        if !self.train {
            return Ok(Record::empty());
        }

        let rate = self.lr.rate();
        let returns = self.trajectory.first_visit_returns(self.discount_factor);
        for (x, g) in returns.iter() {
            self.v.update(x, *g, rate);
        }
        self.trajectory.clear();

        Ok(Record::from_slice(&[
            ("lr", RecordValue::Scalar(rate as f32)),
            ("n_updates", RecordValue::Scalar(returns.len() as f32)),
        ]))
    }

    fn value(&self, obs: &E::Obs) -> f64 {
        self.v.value(&self.features.active(obs.as_slice()))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        self.v.save(path.join("weights.bin"))
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.v = LinearValue::load(path.join("weights.bin"), self.features.n_features())?;
        Ok(())
    }
}
