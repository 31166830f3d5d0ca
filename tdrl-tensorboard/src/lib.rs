//! Writes training records as TensorBoard scalars.
use log::debug;
use std::path::Path;
use tdrl_core::record::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use tensorboard_rs::summary_writer::SummaryWriter;

const AGGREGATE_SUFFIXES: [&str; 4] = ["_min", "_max", "_mean", "_median"];

/// Write records to TFRecord.
///
/// Per-episode records stored by the [`Trainer`](tdrl_core::Trainer) are aggregated on
/// every flush and written against the episode index given to
/// [`flush`](AggregateRecorder::flush).
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    storage: RecordStorage,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            storage: RecordStorage::new(),
            step_key: "episode".to_string(),
        }
    }

    /// The step key and its aggregates are not written as values.
    fn is_step_key(&self, k: &str) -> bool {
        match k.strip_prefix(self.step_key.as_str()) {
            Some("") => true,
            Some(suffix) => AGGREGATE_SUFFIXES.contains(&suffix),
            None => false,
        }
    }

    fn write_with_step(&mut self, record: &Record, step: usize) {
        for (k, v) in record.iter() {
            if self.is_step_key(k) {
                continue;
            }
            let RecordValue::Scalar(v) = v;
            self.writer.add_scalar(k, *v, step);
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// The step is taken from the `episode` value of the record, 0 if missing.
    fn write(&mut self, record: Record) {
        let step = record.get_scalar(&self.step_key).unwrap_or(0.0) as usize;
        self.write_with_step(&record, step);
        self.writer.flush();
    }
}

impl AggregateRecorder for TensorboardRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        debug!("Write {} values at episode {}", record.len(), step);
        self.write_with_step(&record, step.max(0) as usize);
        self.writer.flush();
    }
}
