#![warn(missing_docs)]
//! Agents of tabular and linear reinforcement learning.
//!
//! Control agents learn action values on a [`QTable`](tdrl_core::QTable) over the states
//! of a [`Discretizer`](tdrl_core::Discretizer):
//!
//! * [`QLearning`], [`DoubleQLearning`] and [`ExpectedSarsa`] update after every step,
//! * [`MonteCarloControl`] updates once an episode has ended.
//!
//! Prediction agents evaluate a fixed policy with a
//! [`LinearValue`](tdrl_core::LinearValue) over binary features:
//! [`TdPrediction`] (semi-gradient TD(0)) and [`McPrediction`] (gradient Monte Carlo).
//!
//! All agents implement [`Agent`](tdrl_core::Agent) and are driven by the
//! [`Trainer`](tdrl_core::Trainer).
mod config;
mod double_q_learning;
mod expected_sarsa;
mod explorer;
mod monte_carlo;
mod prediction;
mod q_learning;
mod schedule;
mod util;

pub use config::TabularConfig;
pub use double_q_learning::DoubleQLearning;
pub use expected_sarsa::ExpectedSarsa;
pub use explorer::EpsilonGreedy;
pub use monte_carlo::{MonteCarloConfig, MonteCarloControl, StepSize};
pub use prediction::{FixedPolicy, McPrediction, PredictionConfig, TdPrediction};
pub use q_learning::QLearning;
pub use schedule::LearningRate;
