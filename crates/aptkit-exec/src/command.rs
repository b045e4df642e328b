//! Command description passed to executors

use std::fmt;

use serde::{Deserialize, Serialize};

/// A program invocation with an explicit argument vector
///
/// Arguments are handed to the program as-is; no shell is involved, so
/// package names and patterns are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program to execute
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Extra environment variables
    #[serde(default)]
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Append a single argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run the command through `sudo`, passing on only the variables set
    /// with [`CommandSpec::env`]
    #[must_use]
    pub fn with_sudo(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 2);
        if !self.env.is_empty() {
            let keys: Vec<&str> = self.env.iter().map(|(key, _)| key.as_str()).collect();
            args.push(format!("--preserve-env={}", keys.join(",")));
        }
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            env: self.env,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_display() {
        let cmd = CommandSpec::new("apt-get").args(["install", "-y"]).arg("nano");

        assert_eq!(cmd.program, "apt-get");
        assert_eq!(cmd.args, vec!["install", "-y", "nano"]);
        assert_eq!(cmd.to_string(), "apt-get install -y nano");
    }

    #[test]
    fn test_with_sudo() {
        let cmd = CommandSpec::new("apt-get").arg("update").with_sudo();
        assert_eq!(cmd.to_string(), "sudo apt-get update");

        let cmd = CommandSpec::new("apt-get")
            .arg("upgrade")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .with_sudo();
        assert_eq!(
            cmd.to_string(),
            "sudo --preserve-env=DEBIAN_FRONTEND apt-get upgrade"
        );
        assert_eq!(cmd.env.len(), 1);

        let cmd = CommandSpec::new("apt-get")
            .env("DEBIAN_FRONTEND", "noninteractive")
            .env("APT_LISTCHANGES_FRONTEND", "none")
            .with_sudo();
        assert_eq!(
            cmd.args[0],
            "--preserve-env=DEBIAN_FRONTEND,APT_LISTCHANGES_FRONTEND"
        );
    }
}
