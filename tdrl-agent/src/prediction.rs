//! Prediction of the state values of a fixed policy with a linear function of features.
mod mc;
mod td;
use crate::LearningRate;
use anyhow::Result;
use log::info;
pub use mc::McPrediction;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
pub use td::TdPrediction;

/// The evaluated policy: maps observation values to an action index.
pub type FixedPolicy = Box<dyn Fn(&[f64]) -> usize>;

/// Configuration of [`TdPrediction`] and [`McPrediction`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PredictionConfig {
    pub(crate) discount_factor: f64,
    pub(crate) lr: LearningRate,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            discount_factor: 1.0,
            lr: LearningRate::default(),
        }
    }
}

impl PredictionConfig {
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Learning rate.
    pub fn lr(mut self, v: LearningRate) -> Self {
        self.lr = v;
        self
    }

    /// Constructs [`PredictionConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of prediction agent from {}", path_.to_str().unwrap_or("?"));
        Ok(b)
    }

    /// Saves [`PredictionConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of prediction agent into {}", path_.to_str().unwrap_or("?"));
        Ok(())
    }
}
