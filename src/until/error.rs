use thiserror::Error;

/// Errors produced while supervising a run or starting the child runner.
///
/// IO failures are flattened to strings so the error stays `Clone` and can be
/// carried inside a [`RunOutcome`](crate::until::outcome::RunOutcome).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunUntilError {
    /// The child exited before the target string appeared in a single chunk.
    #[error("Target string was not found while running the command (exit code: {exit_code:?})")]
    TargetNotFound { exit_code: Option<i32> },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The child runner was started without `RUN_UNTIL_TARGET_STRING`.
    #[error("RUN_UNTIL_TARGET_STRING environment variable not set")]
    MissingTarget,

    #[error("Child runner executable not found: {0}")]
    RunnerNotFound(String),

    #[error("IO error: {0}")]
    IO(String),

    #[error("Process handle error: {0}")]
    Handle(String),

    #[error("Signal error: {0}")]
    Signal(String),
}
