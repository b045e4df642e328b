//! Type definitions for package management

use std::fmt;

use aptkit_exec::CommandResult;
use serde::{Deserialize, Serialize};

/// A package known to dpkg, or an upgrade candidate reported by apt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package name
    pub name: String,
    /// dpkg status, or [`PackageStatus::Upgradable`]
    pub status: PackageStatus,
    /// Package architecture (`amd64`, `all`, ...)
    pub architecture: String,
    /// Version string, kept opaque
    pub version: String,
    /// Installed size in kilobytes, 0 when unknown
    #[serde(default)]
    pub installed_size_kb: u64,
    /// One-line summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
}

impl Package {
    /// Create a package record with no size or description
    pub fn new(
        name: impl Into<String>,
        status: PackageStatus,
        architecture: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            architecture: architecture.into(),
            version: version.into(),
            installed_size_kb: 0,
            short_description: None,
        }
    }

    /// Set installed size
    #[must_use]
    pub fn with_installed_size(mut self, kb: u64) -> Self {
        self.installed_size_kb = kb;
        self
    }

    /// Set short description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.short_description = Some(description.into());
        self
    }

    /// Whether dpkg reports the package as fully installed
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.status == PackageStatus::Installed
    }
}

/// Package status as reported by `${db:Status-Status}`
///
/// Unknown strings are preserved in [`PackageStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageStatus {
    NotInstalled,
    ConfigFiles,
    HalfInstalled,
    Unpacked,
    HalfConfigured,
    TriggersAwaiting,
    TriggersPending,
    Installed,
    /// Reported by `apt list --upgradable`, never by dpkg
    Upgradable,
    Other(String),
}

impl PackageStatus {
    /// Text form used by dpkg
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PackageStatus::NotInstalled => "not-installed",
            PackageStatus::ConfigFiles => "config-files",
            PackageStatus::HalfInstalled => "half-installed",
            PackageStatus::Unpacked => "unpacked",
            PackageStatus::HalfConfigured => "half-configured",
            PackageStatus::TriggersAwaiting => "triggers-awaiting",
            PackageStatus::TriggersPending => "triggers-pending",
            PackageStatus::Installed => "installed",
            PackageStatus::Upgradable => "upgradable",
            PackageStatus::Other(s) => s,
        }
    }
}

impl From<&str> for PackageStatus {
    fn from(s: &str) -> Self {
        match s {
            "not-installed" => PackageStatus::NotInstalled,
            "config-files" => PackageStatus::ConfigFiles,
            "half-installed" => PackageStatus::HalfInstalled,
            "unpacked" => PackageStatus::Unpacked,
            "half-configured" => PackageStatus::HalfConfigured,
            "triggers-awaiting" => PackageStatus::TriggersAwaiting,
            "triggers-pending" => PackageStatus::TriggersPending,
            "installed" => PackageStatus::Installed,
            "upgradable" => PackageStatus::Upgradable,
            other => PackageStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PackageStatus {
    fn from(s: String) -> Self {
        PackageStatus::from(s.as_str())
    }
}

impl From<PackageStatus> for String {
    fn from(status: PackageStatus) -> Self {
        match status {
            PackageStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit status and combined output of an apt-get invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Exit status code
    pub status: i32,
    /// stdout followed by stderr
    pub output: String,
}

impl From<&CommandResult> for CommandOutput {
    fn from(result: &CommandResult) -> Self {
        Self {
            status: result.status,
            output: result.combined_output(),
        }
    }
}
