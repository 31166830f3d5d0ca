#![warn(missing_docs)]
//! Core traits, value tables and the training loop for tabular reinforcement learning.
//!
//! The crate is organised around a small number of pieces:
//!
//! * [`Env`], [`Obs`], [`Act`] and [`Step`] describe the environment an agent interacts with.
//! * [`Discretizer`] and [`TileCoder`] map continuous observations to discrete states
//!   or binary feature vectors.
//! * [`QTable`] and [`LinearValue`] hold the learned estimates; [`QTable`] can be written
//!   to and reloaded from a snapshot file.
//! * [`Trainer`] runs the episode loop and [`Evaluator`]s inspect agents between episodes.
//! * [`record`] collects per-episode metrics.
pub mod error;
pub mod record;

mod base;
pub use base::{
    Act, Agent, DiscreteAct, Env, Info, Obs, ObservationSpace, Policy, Step, VecObs,
};

mod discretizer;
pub use discretizer::{linspace, BinSpec, Discretizer, Features, State, TileCoder};

mod table;
pub use table::{argmax_random_tie, LinearValue, QTable, Snapshot, StateAction, StateSpace};

mod trajectory;
pub use trajectory::{DiscountedReturns, Trajectory};

mod trainer;
pub use trainer::{TrainSummary, Trainer, TrainerConfig};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator, ProbeEvaluator};
