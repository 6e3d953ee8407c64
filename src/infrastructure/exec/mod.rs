//! Command Executor Implementations
//!
//! Concrete implementations of the RemoteExecutor port.

mod local;
mod ssh;

pub use local::LocalExecutor;
pub use ssh::SshExecutor;

use std::io::Write;
use std::process::{Command, Stdio};

use crate::domain::ports::{CommandOutput, ExecError};

/// Spawn a prepared process, feed stdin, and collect its output
fn run_process(host: &str, mut cmd: Command, input: Option<&str>) -> Result<CommandOutput, ExecError> {
    let spawn_err = |e: std::io::Error| ExecError::Spawn {
        host: host.to_string(),
        message: e.to_string(),
    };

    let mut child = cmd
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    if let Some(inp) = input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(inp.as_bytes()).map_err(spawn_err)?;
        }
    }

    let output = child.wait_with_output().map_err(spawn_err)?;
    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
