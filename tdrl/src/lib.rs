//! Tabular temporal-difference reinforcement learning.
//!
//! This crate ties the workspace together for the experiment programs under `examples/`:
//!
//! * [`tdrl_core`]: environment and agent traits, discretizers, value tables, the
//!   [`Trainer`](tdrl_core::Trainer) and evaluators.
//! * [`tdrl_agent`]: Q-learning, Double Q-learning, Expected SARSA, Monte Carlo control
//!   and the prediction agents.
//! * [`tdrl_classic_env`]: CartPole, MountainCar and Blackjack.
//! * [`tdrl_tensorboard`]: recorder writing TensorBoard scalars.
//!
//! The modules of this crate hold the settings shared by the programs of one environment.
//!
//! | Program | Environment | Agent |
//! |---------|-------------|-------|
//! | `q_learning_cartpole` | CartPole | [`QLearning`](tdrl_agent::QLearning) |
//! | `double_q_learning_cartpole` | CartPole | [`DoubleQLearning`](tdrl_agent::DoubleQLearning) |
//! | `expected_sarsa_cartpole` | CartPole | [`ExpectedSarsa`](tdrl_agent::ExpectedSarsa) |
//! | `play_cartpole` | CartPole | greedy replay of a saved table |
//! | `monte_carlo_blackjack` | Blackjack | [`MonteCarloControl`](tdrl_agent::MonteCarloControl) |
//! | `td0_mountain_car` | MountainCar | [`TdPrediction`](tdrl_agent::TdPrediction) |
//! | `mc_prediction_mountain_car` | MountainCar | [`McPrediction`](tdrl_agent::McPrediction) |
//!
//! ```bash
//! cargo run --release --example q_learning_cartpole -- --episodes 15000
//! ```
pub mod blackjack;
pub mod cartpole;
pub mod mountain_car;
mod util;
pub use util::create_recorder;
pub use {tdrl_agent, tdrl_classic_env, tdrl_core, tdrl_tensorboard};
