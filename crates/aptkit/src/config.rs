//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use aptkit_sources::{MANAGED_LIST, is_list_file_name};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "APTKIT_CONFIG";

/// Top-level aptkit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Package tool settings
    #[serde(default)]
    pub apt: AptConfig,
    /// Source list settings
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Settings for running dpkg-query, apt and apt-get
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AptConfig {
    /// Prefix apt-get with sudo
    #[serde(default)]
    pub use_sudo: bool,
    /// Kill commands running longer than this many seconds
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
    /// Run apt-get with `DEBIAN_FRONTEND=noninteractive`
    #[serde(default = "default_noninteractive")]
    pub noninteractive: bool,
}

impl Default for AptConfig {
    fn default() -> Self {
        Self {
            use_sudo: false,
            command_timeout_secs: None,
            noninteractive: default_noninteractive(),
        }
    }
}

impl AptConfig {
    /// Configured timeout, if any
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

fn default_noninteractive() -> bool {
    true
}

/// Location of the APT configuration folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Folder containing `sources.list` and `sources.list.d`
    #[serde(default = "default_config_folder")]
    pub config_folder: PathBuf,
    /// File name in `sources.list.d` receiving added repositories
    #[serde(default = "default_managed_file")]
    pub managed_file: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            config_folder: default_config_folder(),
            managed_file: default_managed_file(),
        }
    }
}

fn default_config_folder() -> PathBuf {
    PathBuf::from("/etc/apt")
}

fn default_managed_file() -> String {
    MANAGED_LIST.to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed, or if
    /// `[sources] managed_file` does not end in `.list`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !is_list_file_name(&config.sources.managed_file) {
            return Err(ConfigError::InvalidManagedFile {
                path: path.to_path_buf(),
                name: config.sources.managed_file,
            });
        }
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        for path in Self::default_paths() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        warn!("no config file found, using defaults");
        Ok(Config::default())
    }

    /// Candidate config files, in lookup order
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("aptkit.toml"),
            PathBuf::from("/etc/aptkit/aptkit.toml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("aptkit/aptkit.toml"));
        }
        paths
    }
}
