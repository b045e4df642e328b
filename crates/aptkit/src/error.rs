//! Error types for aptkit

use std::io;
use std::path::PathBuf;

use aptkit_pkg::PackageError;
use aptkit_sources::SourcesError;
use thiserror::Error;

/// Errors loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("reading config {}: {source}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Config file is not valid TOML for [`crate::Config`]
    #[error("parsing config {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// TOML error
        source: toml::de::Error,
    },

    /// `[sources] managed_file` is not a `.list` file name
    #[error("{}: managed_file {name:?} must be a file name ending in .list", path.display())]
    InvalidManagedFile {
        /// Config file path
        path: PathBuf,
        /// Configured name
        name: String,
    },
}

/// Any error raised by aptkit
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Sources(#[from] SourcesError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
