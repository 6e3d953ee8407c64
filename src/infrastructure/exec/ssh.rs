//! SSH executor
//!
//! Runs commands on a remote host with the system `ssh` client. Key and
//! agent handling are left to the user's ssh configuration.

use std::process::Command;

use super::run_process;
use crate::domain::ports::{executor, CommandOutput, ExecError, RemoteCommand, RemoteExecutor};

pub struct SshExecutor {
    /// Host name used in logs and errors
    host: String,
    /// SSH destination (user@host or host alias)
    destination: String,
}

impl SshExecutor {
    pub fn new(host: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl RemoteExecutor for SshExecutor {
    fn host(&self) -> &str {
        &self.host
    }

    fn run_with_input(
        &self,
        command: &RemoteCommand,
        input: Option<&str>,
    ) -> Result<CommandOutput, ExecError> {
        tracing::debug!(host = %self.host, command = %command, "ssh");

        let mut cmd = Command::new("ssh");
        cmd.arg("-o")
            .arg("BatchMode=yes")
            .arg(&self.destination)
            .arg(command.shell_line());

        let output = run_process(&self.host, cmd, input)?;
        // ssh reserves 255 for its own failures
        if output.exit_code == 255 {
            return Err(ExecError::Spawn {
                host: self.host.clone(),
                message: output.stderr.trim().to_string(),
            });
        }
        executor::finish(&self.host, command, output)
    }
}
