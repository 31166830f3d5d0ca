#![warn(missing_docs)]
//! Classic benchmark environments implementing [`Env`](tdrl_core::Env).
//!
//! * [`CartPole`]: CartPole-v0, two actions, episodes cut at 200 steps.
//! * [`MountainCar`]: MountainCar-v0, three actions, episodes cut at 200 steps.
//! * [`Blackjack`]: Blackjack-v0 with an infinite deck, two actions (stick, hit).
//!
//! Observations are [`VecObs`](tdrl_core::VecObs) and actions
//! [`DiscreteAct`](tdrl_core::DiscreteAct). Each environment owns a seeded
//! [`fastrand::Rng`]; [`Env::reset_with_index`](tdrl_core::Env::reset_with_index) draws the
//! initial state from a generator seeded with the index, so that evaluation episodes are
//! reproducible.
mod blackjack;
mod cartpole;
mod mountain_car;
mod util;

pub use blackjack::{Blackjack, BlackjackConfig};
pub use cartpole::{CartPole, CartPoleConfig};
pub use mountain_car::{MountainCar, MountainCarConfig};
