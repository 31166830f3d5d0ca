//! Semi-gradient TD(0) prediction.
use super::{FixedPolicy, PredictionConfig};
use crate::{
    util::{check_features, TdErrorMean},
    LearningRate,
};
use anyhow::Result;
use std::{marker::PhantomData, path::Path};
use tdrl_core::{
    record::{Record, RecordValue},
    Agent, Env, Features, LinearValue, Obs, ObservationSpace, Policy, Step,
};

/// Semi-gradient TD(0) evaluation of a fixed policy.
///
/// After every step the weights of the features active in `s` are moved towards
/// `r + gamma * v(s')`, the bootstrap term being dropped when `s'` is terminal.
pub struct TdPrediction<E: Env, F: Features> {
    features: F,
    v: LinearValue,
    policy: FixedPolicy,
    discount_factor: f64,
    lr: LearningRate,
    train: bool,
    td_error: TdErrorMean,
    phantom: PhantomData<E>,
}

impl<E: Env, F: Features> TdPrediction<E, F> {
    /// Constructs the agent with zero weights.
    pub fn build(config: PredictionConfig, features: F, policy: FixedPolicy) -> Self {
        let v = LinearValue::new(features.n_features());
        Self {
            features,
            v,
            policy,
            discount_factor: config.discount_factor,
            lr: config.lr,
            train: true,
            td_error: TdErrorMean::default(),
            phantom: PhantomData,
        }
    }

    /// The value function.
    pub fn v(&self) -> &LinearValue {
        &self.v
    }
}

impl<E: Env, F: Features> Policy<E> for TdPrediction<E, F> {
    fn sample(&mut self, obs: &E::Obs) -> E::Act {
        (self.policy)(obs.as_slice()).into()
    }
}

impl<E: Env, F: Features> Agent<E> for TdPrediction<E, F> {
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
        if self.train {
            self.lr.on_episode(episode);
        }
    }

    fn observe(&mut self, obs: &E::Obs, step: &Step<E>) -> Result<Record> {
        if !self.train {
            return Ok(Record::empty());
        }

        let x = self.features.active(obs.as_slice());
        let target = match step.is_terminated {
            true => step.reward as f64,
            false => {
                let x_ = self.features.active(step.obs.as_slice());
                step.reward as f64 + self.discount_factor * self.v.value(&x_)
            }
        };
        let delta = self.v.update(&x, target, self.lr.rate());
        self.td_error.push(delta);

        Ok(Record::empty())
    }

    fn end_episode(&mut self) -> Result<Record> {
        let mut record = Record::from_scalar("lr", self.lr.rate() as f32);
        if let Some(td_error) = self.td_error.take() {
            record.insert("td_error", RecordValue::Scalar(td_error));
        }
        Ok(record)
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
