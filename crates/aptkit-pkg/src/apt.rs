//! APT package manager (Debian/Ubuntu)

use std::sync::Arc;
use std::time::Duration;

use aptkit_exec::{CommandExecutor, CommandResult, CommandSpec};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::PackageError;
use crate::parse::{
    DPKG_QUERY_FORMAT, NO_PACKAGES_FOUND, parse_dpkg_query_output, parse_list_upgradable_output,
};
use crate::traits::PackageManager;
use crate::types::{CommandOutput, Package};

/// APT package manager implementation
pub struct AptManager {
    /// Executor for running commands
    executor: Arc<dyn CommandExecutor>,
    /// Whether to prefix mutating commands with sudo
    use_sudo: bool,
    /// Whether to set `DEBIAN_FRONTEND=noninteractive` for apt-get
    noninteractive: bool,
    /// Optional per-command timeout
    timeout: Option<Duration>,
}

impl AptManager {
    /// Create a new APT manager
    ///
    /// # Arguments
    /// * `executor` - Executor for running dpkg-query, apt and apt-get
    /// * `use_sudo` - Whether to prefix apt-get commands with sudo
    pub fn new(executor: Arc<dyn CommandExecutor>, use_sudo: bool) -> Self {
        Self {
            executor,
            use_sudo,
            noninteractive: true,
            timeout: None,
        }
    }

    /// Give up on commands running longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Control whether apt-get runs with `DEBIAN_FRONTEND=noninteractive`
    #[must_use]
    pub fn with_noninteractive(mut self, noninteractive: bool) -> Self {
        self.noninteractive = noninteractive;
        self
    }

    /// Build an apt-get command with optional sudo
    fn apt_get_cmd<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cmd = CommandSpec::new("apt-get").args(args);
        if self.noninteractive {
            cmd = cmd.env("DEBIAN_FRONTEND", "noninteractive");
        }
        if self.use_sudo {
            cmd = cmd.with_sudo();
        }
        cmd
    }

    /// Build `apt-get <verb> -y <packages...>`, rejecting empty names
    fn apt_get_packages_cmd(
        &self,
        verb: &'static str,
        operation: &'static str,
        packages: &[&str],
    ) -> Result<CommandSpec, PackageError> {
        if packages.iter().any(|name| name.is_empty()) {
            return Err(PackageError::InvalidPackage { operation });
        }
        Ok(self.apt_get_cmd([verb, "-y"]).args(packages.iter().copied()))
    }

    async fn execute(&self, cmd: &CommandSpec) -> Result<CommandResult, PackageError> {
        let result = match self.timeout {
            Some(timeout) => self.executor.run_with_timeout(cmd, timeout).await?,
            None => self.executor.run(cmd).await?,
        };
        Ok(result)
    }

    /// Run a mutating apt-get command, mapping a non-zero exit to an error
    async fn run_apt_get(&self, cmd: CommandSpec) -> Result<CommandOutput, PackageError> {
        let result = self.execute(&cmd).await?;
        let output = CommandOutput::from(&result);

        if !result.success() {
            return Err(Self::classify_failure(&cmd, output));
        }

        info!(command = %cmd, "apt-get completed");
        Ok(output)
    }

    fn classify_failure(cmd: &CommandSpec, output: CommandOutput) -> PackageError {
        let command = cmd.to_string();
        // dpkg frontend lock held by another process
        if output.output.contains("Could not get lock") {
            return PackageError::LockConflict {
                command,
                output: output.output,
            };
        }
        if output.output.contains("Permission denied")
            || output.output.contains("are you root?")
        {
            return PackageError::PermissionDenied {
                command,
                output: output.output,
            };
        }
        PackageError::CommandFailed {
            command,
            status: output.status,
            output: output.output,
        }
    }
}

#[async_trait]
impl PackageManager for AptManager {
    #[instrument(skip(self))]
    async fn search(&self, pattern: &str) -> Result<Vec<Package>, PackageError> {
        let cmd = CommandSpec::new("dpkg-query")
            .arg("-W")
            .arg(format!("-f={DPKG_QUERY_FORMAT}"))
            .arg(pattern);
        let result = self.execute(&cmd).await?;

        if !result.success() {
            let output = result.combined_output();
            if output.contains(NO_PACKAGES_FOUND) {
                debug!("no packages matched");
                return Ok(Vec::new());
            }
            return Err(PackageError::CommandFailed {
                command: cmd.to_string(),
                status: result.status,
                output,
            });
        }

        let packages = parse_dpkg_query_output(&result.stdout);
        debug!(count = packages.len(), "dpkg-query returned packages");

        Ok(packages)
    }

    #[instrument(skip(self))]
    async fn check_for_updates(&self) -> Result<CommandOutput, PackageError> {
        debug!("updating package lists");
        self.run_apt_get(self.apt_get_cmd(["update", "-q"])).await
    }

    #[instrument(skip(self))]
    async fn list_upgradable(&self) -> Result<Vec<Package>, PackageError> {
        let cmd = CommandSpec::new("apt").args(["list", "--upgradable"]);
        let result = self.execute(&cmd).await?;

        if !result.success() {
            return Err(PackageError::CommandFailed {
                command: cmd.to_string(),
                status: result.status,
                output: result.combined_output(),
            });
        }

        // stderr carries apt's CLI stability warning
        let packages = parse_list_upgradable_output(&result.stdout);
        info!(count = packages.len(), "found upgradable packages");

        Ok(packages)
    }

    #[instrument(skip(self))]
    async fn upgrade(&self, packages: &[&str]) -> Result<CommandOutput, PackageError> {
        let cmd = self.apt_get_packages_cmd("upgrade", "apt-get upgrade", packages)?;
        self.run_apt_get(cmd).await
    }

    #[instrument(skip(self))]
    async fn upgrade_all(&self) -> Result<CommandOutput, PackageError> {
        info!("starting apt-get upgrade");
        self.run_apt_get(self.apt_get_cmd(["upgrade", "-y"])).await
    }

    #[instrument(skip(self))]
    async fn install(&self, packages: &[&str]) -> Result<CommandOutput, PackageError> {
        let cmd = self.apt_get_packages_cmd("install", "apt-get install", packages)?;
        self.run_apt_get(cmd).await
    }

    #[instrument(skip(self))]
    async fn remove(&self, packages: &[&str]) -> Result<CommandOutput, PackageError> {
        let cmd = self.apt_get_packages_cmd("remove", "apt-get remove", packages)?;
        self.run_apt_get(cmd).await
    }

    async fn is_available(&self) -> bool {
        match self
            .executor
            .run(&CommandSpec::new("dpkg-query").arg("--version"))
            .await
        {
            Ok(result) => result.success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptkit_exec::ExecError;

    struct NeverRun;

    #[async_trait]
    impl CommandExecutor for NeverRun {
        async fn run(&self, cmd: &CommandSpec) -> Result<CommandResult, ExecError> {
            panic!("unexpected command: {cmd}");
        }

        async fn run_with_timeout(
            &self,
            cmd: &CommandSpec,
            _timeout: Duration,
        ) -> Result<CommandResult, ExecError> {
            self.run(cmd).await
        }

        fn executor_type(&self) -> &'static str {
            "never"
        }
    }

    #[test]
    fn test_apt_get_cmd() {
        let apt = AptManager::new(Arc::new(NeverRun), false);
        let cmd = apt.apt_get_packages_cmd("install", "apt-get install", &["nano", "vim"]).unwrap();

        assert_eq!(cmd.to_string(), "apt-get install -y nano vim");
        assert_eq!(
            cmd.env,
            vec![("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())]
        );

        let apt = AptManager::new(Arc::new(NeverRun), true).with_noninteractive(false);
        let cmd = apt.apt_get_cmd(["update", "-q"]);
        assert_eq!(cmd.to_string(), "sudo apt-get update -q");
        assert!(cmd.env.is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_rejected_before_running() {
        let apt = AptManager::new(Arc::new(NeverRun), false);

        let err = apt.install(&["nano", ""]).await.unwrap_err();
        assert!(matches!(
            err,
            PackageError::InvalidPackage {
                operation: "apt-get install"
            }
        ));
        assert!(apt.remove(&[""]).await.is_err());
        assert!(apt.upgrade(&[""]).await.is_err());
    }

    #[test]
    fn test_classify_failure() {
        let cmd = CommandSpec::new("apt-get").args(["install", "-y", "nano"]);

        let lock = AptManager::classify_failure(
            &cmd,
            CommandOutput {
                status: 100,
                output: "E: Could not get lock /var/lib/dpkg/lock-frontend".to_string(),
            },
        );
        assert!(lock.is_retryable());

        let perm = AptManager::classify_failure(
            &cmd,
            CommandOutput {
                status: 100,
                output: "E: Unable to acquire the dpkg frontend lock, are you root?".to_string(),
            },
        );
        assert!(perm.needs_sudo());

        let other = AptManager::classify_failure(
            &cmd,
            CommandOutput {
                status: 100,
                output: "E: Unable to locate package nano".to_string(),
            },
        );
        assert!(matches!(other, PackageError::CommandFailed { status: 100, .. }));
        assert_eq!(other.output(), Some("E: Unable to locate package nano"));
    }
}
