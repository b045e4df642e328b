//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::command::CommandSpec;
use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs commands and reports their output and exit status
///
/// Implementations return `Ok` for any command that ran to completion,
/// whatever its exit status.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run a command and wait for it to exit
    async fn run(&self, cmd: &CommandSpec) -> Result<CommandResult, ExecError>;

    /// Run a command, giving up after `timeout`
    async fn run_with_timeout(
        &self,
        cmd: &CommandSpec,
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Short name of the executor, for logging
    fn executor_type(&self) -> &'static str;
}
