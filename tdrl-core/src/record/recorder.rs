use super::Record;

/// Writes a record to an output destination.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);
}

/// Stores records and writes values aggregated over them on [`flush`](Self::flush).
///
/// The [`Trainer`](crate::Trainer) stores one record per episode and flushes at a fixed
/// episode interval.
pub trait AggregateRecorder {
    /// Stores a record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records, then drops them.
    ///
    /// `step` is the episode index at which the flush happens.
    fn flush(&mut self, step: i64);
}
