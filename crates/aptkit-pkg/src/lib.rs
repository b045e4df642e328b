//! aptkit-pkg: Debian package queries and operations
//!
//! Wraps `dpkg-query`, `apt` and `apt-get` behind the [`PackageManager`]
//! trait and parses their output into [`Package`] records.

pub mod apt;
pub mod error;
pub mod parse;
pub mod traits;
pub mod types;

pub use apt::AptManager;
pub use error::PackageError;
pub use traits::PackageManager;
pub use types::{CommandOutput, Package, PackageStatus};
