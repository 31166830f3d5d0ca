//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// None of these are recovered internally: they are returned to the caller of the
/// constructor, the trainer or the snapshot loader, which is expected to abort the run.
#[derive(Error, Debug)]
pub enum TdrlError {
    /// Invalid bin specification or a table shape that does not fit the environment.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A snapshot does not match the state space of the configured discretizer.
    #[error("State space mismatch: {0}")]
    StateSpaceMismatch(String),

    /// The environment failed during reset or step.
    #[error("Environment failure during {phase}: {message}")]
    EnvironmentFailure {
        /// `"reset"` or `"step"`.
        phase: &'static str,
        /// Rendered error chain of the environment.
        message: String,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),
}

impl TdrlError {
    /// Wraps an error of the environment raised during `phase`.
    pub fn env_failure(phase: &'static str, err: anyhow::Error) -> Self {
        Self::EnvironmentFailure {
            phase,
            message: format!("{:#}", err),
        }
    }
}
