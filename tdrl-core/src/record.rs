//! Types and traits for recording metrics of training runs.
//!
//! * [`Record`] - key-value container filled by environments, agents and the trainer
//! * [`RecordValue`] - the kinds of values a record can hold
//! * [`Recorder`] - writes records to some destination
//! * [`AggregateRecorder`] - buffers records and writes aggregated values on flush
//! * [`RecordStorage`] - aggregation (min, max, mean, median) of buffered scalars
//! * [`BufferedRecorder`] - keeps records in memory, mostly for inspecting evaluation runs
//! * [`NullRecorder`] - discards everything
//!
//! ```rust
//! use tdrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("episode_return", 21.0);
//! record.insert("epsilon", RecordValue::Scalar(0.42));
//! assert_eq!(record.get_scalar("episode_return").unwrap(), 21.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
