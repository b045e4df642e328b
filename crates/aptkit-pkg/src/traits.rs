//! Package manager traits

use async_trait::async_trait;

use crate::error::PackageError;
use crate::types::{CommandOutput, Package};

/// Queries and mutates the package state of a host
///
/// Every call waits for the underlying tool to exit. Mutating calls
/// reject empty package names before running anything.
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// List every package known to the package database
    async fn list(&self) -> Result<Vec<Package>, PackageError> {
        self.search("*").await
    }

    /// List packages whose name matches `pattern`
    ///
    /// A pattern matching nothing yields an empty list, not an error.
    async fn search(&self, pattern: &str) -> Result<Vec<Package>, PackageError>;

    /// Refresh the package catalog from the configured repositories
    async fn check_for_updates(&self) -> Result<CommandOutput, PackageError>;

    /// List packages with a newer version available
    async fn list_upgradable(&self) -> Result<Vec<Package>, PackageError>;

    /// Upgrade the named packages
    async fn upgrade(&self, packages: &[&str]) -> Result<CommandOutput, PackageError>;

    /// Upgrade every upgradable package
    async fn upgrade_all(&self) -> Result<CommandOutput, PackageError>;

    /// Install the named packages
    async fn install(&self, packages: &[&str]) -> Result<CommandOutput, PackageError>;

    /// Remove the named packages
    async fn remove(&self, packages: &[&str]) -> Result<CommandOutput, PackageError>;

    /// Check whether the package tools can be executed
    async fn is_available(&self) -> bool;
}
