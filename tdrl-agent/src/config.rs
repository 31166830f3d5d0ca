//! Configuration of the tabular control agents.
use crate::{EpsilonGreedy, LearningRate};
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tdrl_core::BinSpec;

/// Configuration of [`QLearning`](crate::QLearning),
/// [`DoubleQLearning`](crate::DoubleQLearning) and [`ExpectedSarsa`](crate::ExpectedSarsa).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TabularConfig {
    pub(crate) bins: Vec<BinSpec>,
    pub(crate) n_actions: usize,
    pub(crate) discount_factor: f64,
    pub(crate) lr: LearningRate,
    pub(crate) explorer: EpsilonGreedy,
    pub(crate) seed: u64,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            bins: vec![],
            n_actions: 2,
            discount_factor: 1.0,
            lr: LearningRate::default(),
            explorer: EpsilonGreedy::default(),
            seed: 42,
        }
    }
}

impl TabularConfig {
    /// Bins of each observation dimension.
    pub fn bins(mut self, v: Vec<BinSpec>) -> Self {
        self.bins = v;
        self
    }

    /// The number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

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

    /// Explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Random seed of the agent.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`TabularConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of tabular agent from {}", path_.to_str().unwrap_or("?"));
        Ok(b)
    }

    /// Saves [`TabularConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of tabular agent into {}", path_.to_str().unwrap_or("?"));
        Ok(())
    }
}
