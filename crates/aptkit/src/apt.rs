//! Package manager and source list handles built from configuration

use std::sync::Arc;

use aptkit_exec::{CommandExecutor, LocalExecutor};
use aptkit_pkg::{AptManager, PackageManager};
use aptkit_sources::SourcesFolder;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// Entry point pairing a [`PackageManager`] with a [`SourcesFolder`]
pub struct Apt {
    packages: Arc<dyn PackageManager>,
    sources: SourcesFolder,
}

impl Apt {
    /// Combine existing handles
    pub fn new(packages: Arc<dyn PackageManager>, sources: SourcesFolder) -> Self {
        Self { packages, sources }
    }

    /// Build handles running commands on the local machine
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_executor(config, Arc::new(LocalExecutor::new()))
    }

    /// Build handles running commands through `executor`
    pub fn with_executor(config: &Config, executor: Arc<dyn CommandExecutor>) -> Self {
        debug!(
            executor = executor.executor_type(),
            config_folder = %config.sources.config_folder.display(),
            "building apt handles"
        );

        let mut manager = AptManager::new(executor, config.apt.use_sudo)
            .with_noninteractive(config.apt.noninteractive);
        if let Some(timeout) = config.apt.command_timeout() {
            manager = manager.with_timeout(timeout);
        }

        let sources = SourcesFolder::new(&config.sources.config_folder)
            .with_managed_file(&config.sources.managed_file);

        Self::new(Arc::new(manager), sources)
    }

    /// Load configuration from the default locations and build handles
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be loaded
    pub fn load_default() -> Result<Self> {
        let config = Config::load_default()?;
        Ok(Self::from_config(&config))
    }

    /// Package queries and operations
    #[must_use]
    pub fn packages(&self) -> &dyn PackageManager {
        self.packages.as_ref()
    }

    /// APT source list folder
    #[must_use]
    pub fn sources(&self) -> &SourcesFolder {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    use aptkit_exec::{CommandResult, CommandSpec, ExecError};
    use aptkit_pkg::PackageStatus;
    use aptkit_sources::{Repository, SOURCES_LIST_D};
    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{AptConfig, SourcesConfig};
    use crate::error::Error;

    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<(String, Option<Duration>)>>,
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn run(&self, cmd: &CommandSpec) -> Result<CommandResult, ExecError> {
            self.calls.lock().unwrap().push((cmd.to_string(), None));
            Ok(CommandResult::new(0, "nano/jammy 6.2-1 amd64\n", ""))
        }

        async fn run_with_timeout(
            &self,
            cmd: &CommandSpec,
            timeout: Duration,
        ) -> Result<CommandResult, ExecError> {
            self.calls.lock().unwrap().push((cmd.to_string(), Some(timeout)));
            Ok(CommandResult::new(0, "nano/jammy 6.2-1 amd64\n", ""))
        }

        fn executor_type(&self) -> &'static str {
            "recording"
        }
    }

    fn config_for(root: &Path) -> Config {
        Config {
            apt: AptConfig {
                use_sudo: true,
                command_timeout_secs: Some(5),
                noninteractive: true,
            },
            sources: SourcesConfig {
                config_folder: root.to_path_buf(),
                managed_file: "aptkit.list".to_string(),
            },
        }
    }

    #[test]
    fn test_from_config_paths() {
        let apt = Apt::from_config(&Config::default());

        assert_eq!(apt.sources().root(), Path::new("/etc/apt"));
        assert_eq!(
            apt.sources().managed_path(),
            Path::new("/etc/apt/sources.list.d/managed.list")
        );
    }

    #[tokio::test]
    async fn test_with_executor_applies_config() -> Result<()> {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(SOURCES_LIST_D)).unwrap();
        let executor = Arc::new(RecordingExecutor::default());
        let apt = Apt::with_executor(&config_for(dir.path()), executor.clone());

        let upgradable = apt.packages().list_upgradable().await?;
        apt.packages().install(&["nano"]).await?;
        let repo = Repository::new("http://deb.example.org", "jammy", "main");
        apt.sources().add(&repo)?;

        assert_eq!(upgradable[0].status, PackageStatus::Upgradable);
        assert_eq!(
            *executor.calls.lock().unwrap(),
            vec![
                ("apt list --upgradable".to_string(), Some(Duration::from_secs(5))),
                (
                    "sudo --preserve-env=DEBIAN_FRONTEND apt-get install -y nano".to_string(),
                    Some(Duration::from_secs(5))
                ),
            ]
        );
        assert!(
            dir.path()
                .join(SOURCES_LIST_D)
                .join("aptkit.list")
                .is_file()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_errors_convert() {
        let dir = TempDir::new().unwrap();
        let apt = Apt::with_executor(
            &config_for(dir.path()),
            Arc::new(RecordingExecutor::default()),
        );

        let run = || -> Result<()> {
            apt.sources().scan()?;
            Ok(())
        };
        assert!(matches!(run(), Err(Error::Sources(_))));

        let err: Error = apt.packages().remove(&[""]).await.unwrap_err().into();
        assert!(matches!(err, Error::Package(_)));
    }
}
