//! Error types for aptkit-pkg

use aptkit_exec::ExecError;
use thiserror::Error;

/// Errors that can occur during package operations
#[derive(Error, Debug, Clone)]
pub enum PackageError {
    /// A package passed to a mutating operation has an empty name
    #[error("{operation}: invalid package with empty name")]
    InvalidPackage {
        /// Operation that rejected the input
        operation: &'static str,
    },

    /// Command exited non-zero
    #[error("running {command}: exit status {status} - {output}")]
    CommandFailed {
        /// Command line
        command: String,
        /// Exit status
        status: i32,
        /// Combined output of the tool
        output: String,
    },

    /// Lock file conflict (another package manager is running)
    #[error("lock file conflict running {command}: {output}")]
    LockConflict {
        /// Command line
        command: String,
        /// Combined output of the tool
        output: String,
    },

    /// Insufficient permissions (need sudo)
    #[error("insufficient permissions running {command}: {output}")]
    PermissionDenied {
        /// Command line
        command: String,
        /// Combined output of the tool
        output: String,
    },

    /// Command could not be executed at all
    #[error("execution error: {0}")]
    ExecutionError(#[from] ExecError),
}

impl PackageError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            PackageError::LockConflict { .. } => true,
            PackageError::ExecutionError(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Check if error indicates need for sudo
    #[must_use]
    pub fn needs_sudo(&self) -> bool {
        matches!(self, PackageError::PermissionDenied { .. })
    }

    /// Diagnostic output of the tool, when it ran
    #[must_use]
    pub fn output(&self) -> Option<&str> {
        match self {
            PackageError::CommandFailed { output, .. }
            | PackageError::LockConflict { output, .. }
            | PackageError::PermissionDenied { output, .. } => Some(output),
            _ => None,
        }
    }
}
