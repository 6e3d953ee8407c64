//! RemoteExecutor port - running shell commands on a target host
//!
//! One executor is bound to one host. Implementations:
//! - `SshExecutor` - `ssh <destination> <command>`
//! - `LocalExecutor` - `sh -c <command>` on this machine

use std::fmt;

/// A shell command line plus how it should be run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    line: String,
    privileged: bool,
    warn_only: bool,
}

impl RemoteCommand {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            privileged: false,
            warn_only: false,
        }
    }

    /// Run through `sudo`
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// A non-zero exit is returned as output instead of an error (probe-style checks)
    pub fn warn_only(mut self) -> Self {
        self.warn_only = true;
        self
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }

    pub fn is_warn_only(&self) -> bool {
        self.warn_only
    }

    /// The line as it is handed to the shell
    pub fn shell_line(&self) -> String {
        if self.privileged {
            format!("sudo sh -c {}", shell_quote(&self.line))
        } else {
            self.line.clone()
        }
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.shell_line())
    }
}

/// Captured result of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    /// The process could not be started (ssh missing, connection refused before exec)
    #[error("[{host}] could not run command: {message}")]
    Spawn { host: String, message: String },

    /// The command ran and exited non-zero
    #[error("[{host}] `{command}` exited with {exit_code}: {stderr}")]
    Failed {
        host: String,
        command: String,
        exit_code: i32,
        stderr: String,
    },
}

pub trait RemoteExecutor: Send + Sync {
    /// Host this executor runs commands on
    fn host(&self) -> &str;

    /// Run a command, optionally feeding `input` on stdin
    fn run_with_input(
        &self,
        command: &RemoteCommand,
        input: Option<&str>,
    ) -> Result<CommandOutput, ExecError>;

    fn run(&self, command: &RemoteCommand) -> Result<CommandOutput, ExecError> {
        self.run_with_input(command, None)
    }
}

/// Quote a string for safe use as a single shell word
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Quote a path for safe use as a single shell word
pub fn quote_path(path: &std::path::Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// Turn a finished process into a `CommandOutput`, honouring warn-only mode
pub fn finish(
    host: &str,
    command: &RemoteCommand,
    output: CommandOutput,
) -> Result<CommandOutput, ExecError> {
    if output.success() || command.is_warn_only() {
        Ok(output)
    } else {
        Err(ExecError::Failed {
            host: host.to_string(),
            command: command.line().to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn quote_simple() {
        assert_eq!(shell_quote("/srv/app"), "'/srv/app'");
    }

    #[test]
    fn quote_with_single_quote() {
        assert_eq!(quote_path(Path::new("/home/it's")), "'/home/it'\\''s'");
    }

    #[test]
    fn privileged_wraps_in_sudo() {
        let cmd = RemoteCommand::new("pkg_add haproxy").privileged();
        assert_eq!(cmd.shell_line(), "sudo sh -c 'pkg_add haproxy'");
    }

    #[test]
    fn warn_only_keeps_failure_as_output() {
        let cmd = RemoteCommand::new("grep haproxy /etc/x").warn_only();
        let out = CommandOutput {
            exit_code: 1,
            ..Default::default()
        };
        assert_eq!(finish("web1", &cmd, out).unwrap().exit_code, 1);
    }

    #[test]
    fn strict_failure_is_error() {
        let cmd = RemoteCommand::new("false");
        let out = CommandOutput {
            exit_code: 1,
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        };
        assert_eq!(
            finish("web1", &cmd, out),
            Err(ExecError::Failed {
                host: "web1".to_string(),
                command: "false".to_string(),
                exit_code: 1,
                stderr: "boom".to_string(),
            })
        );
    }
}
