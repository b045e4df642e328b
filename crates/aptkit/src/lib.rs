//! aptkit: Debian package state and APT source list management
//!
//! Re-exports the package, source list and execution crates and wires
//! them together from a TOML configuration.

pub mod apt;
pub mod config;
pub mod error;

pub use aptkit_exec as exec;
pub use aptkit_pkg as pkg;
pub use aptkit_sources as sources;

pub use apt::Apt;
pub use aptkit_pkg::{AptManager, CommandOutput, Package, PackageError, PackageManager, PackageStatus};
pub use aptkit_sources::{Repository, RepositoryList, SourceEntry, SourcesError, SourcesFolder};
pub use config::{AptConfig, Config, SourcesConfig};
pub use error::{ConfigError, Error, Result};
