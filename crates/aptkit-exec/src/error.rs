//! Error types for aptkit-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while executing a command
///
/// A command that runs and exits non-zero is not an error at this layer;
/// callers inspect [`crate::CommandResult::status`].
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Process could not be spawned (program missing, not executable)
    #[error("failed to spawn {command}: {message}")]
    SpawnError {
        /// Command line that was attempted
        command: String,
        /// Underlying error
        message: String,
    },

    /// I/O error while waiting for the process
    #[error("I/O error running {command}: {message}")]
    IoError {
        /// Command line that was running
        command: String,
        /// Underlying error
        message: String,
    },

    /// Command timed out
    #[error("{command} timed out after {timeout:?}")]
    Timeout {
        /// Command line that was running
        command: String,
        /// Timeout duration that was exceeded
        timeout: Duration,
    },
}

impl ExecError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }

    /// Check if the program could not be started at all
    #[must_use]
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, ExecError::SpawnError { .. })
    }
}
