use log::info;
use tdrl_core::record::{AggregateRecorder, NullRecorder};
use tdrl_tensorboard::TensorboardRecorder;

/// Writes TensorBoard scalars into `logdir`, or discards records if `logdir` is `None`.
pub fn create_recorder(logdir: Option<&str>) -> Box<dyn AggregateRecorder> {
    match logdir {
        Some(logdir) => {
            info!("Write TensorBoard records into {}", logdir);
            Box::new(TensorboardRecorder::new(logdir))
        }
        None => Box::new(NullRecorder::new()),
    }
}
