//! Local executor
//!
//! Runs commands with `sh -c` on this machine, for hosts configured with
//! `address = "local"`.

use std::process::Command;

use super::run_process;
use crate::domain::ports::{executor, CommandOutput, ExecError, RemoteCommand, RemoteExecutor};

pub struct LocalExecutor {
    host: String,
}

impl LocalExecutor {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new("local")
    }
}

impl RemoteExecutor for LocalExecutor {
    fn host(&self) -> &str {
        &self.host
    }

    fn run_with_input(
        &self,
        command: &RemoteCommand,
        input: Option<&str>,
    ) -> Result<CommandOutput, ExecError> {
        tracing::debug!(host = %self.host, command = %command, "sh");

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command.shell_line());
        let output = run_process(&self.host, cmd, input)?;
        executor::finish(&self.host, command, output)
    }
}
