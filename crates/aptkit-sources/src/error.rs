//! Error types for aptkit-sources

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or rewriting APT source lists
#[derive(Error, Debug)]
pub enum SourcesError {
    /// A source list file could not be read
    #[error("reading {}: {source}", path.display())]
    Read {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The `sources.list.d` folder could not be listed
    #[error("reading {} folder: {source}", path.display())]
    ReadDir {
        /// Folder being listed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A file could not be written
    #[error("writing {}: {source}", path.display())]
    Write {
        /// File being written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The original file could not be moved to its backup path
    #[error("making backup copy of {}: {source}", path.display())]
    Backup {
        /// File being backed up
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The replacement could not be moved into place
    #[error("renaming {} to {}: {source}", from.display(), to.display())]
    Rename {
        /// Replacement file
        from: PathBuf,
        /// Target path
        to: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// An equivalent repository is already configured
    #[error("repository is already configured: {0}")]
    AlreadyExists(String),

    /// No equivalent repository is configured
    #[error("repository not found: {0}")]
    NotFound(String),

    /// The managed file name would not be picked up by a scan
    #[error("managed file {0:?} must be a file name ending in .list")]
    InvalidManagedFile(String),

    /// Text is not a `deb`/`deb-src` line
    #[error("not a deb or deb-src line: {0:?}")]
    InvalidLine(String),
}

impl SourcesError {
    /// Check if an add failed because the repository exists
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, SourcesError::AlreadyExists(_))
    }

    /// Check if a remove or edit failed because the repository is absent
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourcesError::NotFound(_))
    }
}
