//! Error types for process supervision.

use thiserror::Error;

/// Errors returned by `start()` / `stop()`. None of them leave the state machine
/// in a transitional state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupervisorError {
    /// The configured executable is not on PATH / not a file.
    #[error("server executable '{0}' not found")]
    ExecutableNotFound(String),

    /// A process is already starting or running.
    #[error("server already running")]
    AlreadyRunning,

    /// The OS refused to spawn the process.
    #[error("failed to start server: {0}")]
    ProcessSpawnFailed(String),

    /// The process could not be terminated.
    #[error("failed to stop server: {0}")]
    StopFailed(String),
}
