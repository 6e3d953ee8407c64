//! Rsync Transfer
//!
//! Uses rsync over ssh for incremental, checksum-based transfers.
//! This is the transfer used for every real host.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::domain::ports::{DeleteMode, FileTransfer, SyncSpec, TransferError, TransferStats};

/// Transfer to `destination` (an ssh destination such as `deploy@web1`)
pub struct RsyncTransfer {
    destination: String,
}

impl RsyncTransfer {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Check if rsync is installed and available
    pub fn check_available() -> bool {
        Command::new("rsync")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Arguments for one push; rsync `-i` output is parsed for stats
    pub(crate) fn build_args(&self, local_dir: &Path, remote_dir: &Path, spec: &SyncSpec) -> Vec<String> {
        let mut args = spec_flags(spec);
        args.push("-e".to_string());
        args.push("ssh".to_string());
        // trailing slash = copy contents
        args.push(format!("{}/", local_dir.display().to_string().trim_end_matches('/')));
        args.push(format!(
            "{}:{}/",
            self.destination,
            remote_dir.display().to_string().trim_end_matches('/')
        ));
        args
    }
}

/// rsync flags expressing a `SyncSpec`
pub(crate) fn spec_flags(spec: &SyncSpec) -> Vec<String> {
    let mut args = vec!["-rpt".to_string(), "--itemize-changes".to_string()];
    if spec.checksum {
        args.push("--checksum".to_string());
    }
    if spec.delete == DeleteMode::DeleteAfter {
        args.push("--delete-after".to_string());
    }
    for pattern in &spec.protect {
        args.push("--filter".to_string());
        args.push(format!("P {}", pattern));
    }
    args
}

/// Parse `--itemize-changes` lines into transfer stats
pub(crate) fn parse_itemized(output: &str) -> TransferStats {
    let mut stats = TransferStats::default();
    for line in output.lines() {
        if let Some(path) = line.strip_prefix("*deleting") {
            stats.deleted.push(PathBuf::from(path.trim()));
            continue;
        }
        let mut parts = line.splitn(2, ' ');
        let (Some(flags), Some(path)) = (parts.next(), parts.next()) else {
            continue;
        };
        if flags.len() == 11 && flags.starts_with('>') && flags.as_bytes()[1] == b'f' {
            stats.transferred.push(PathBuf::from(path.trim()));
        }
    }
    stats
}

impl FileTransfer for RsyncTransfer {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn push(
        &self,
        local_dir: &Path,
        remote_dir: &Path,
        spec: &SyncSpec,
    ) -> Result<TransferStats, TransferError> {
        if !local_dir.is_dir() {
            return Err(TransferError::MissingSource(local_dir.to_path_buf()));
        }
        if !Self::check_available() {
            return Err(TransferError::Unavailable(
                "rsync is not installed or not in PATH".to_string(),
            ));
        }

        let args = self.build_args(local_dir, remote_dir, spec);
        tracing::debug!(destination = %self.destination, ?args, "running rsync");

        let output = Command::new("rsync")
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TransferError::io(local_dir, e))?;

        if !output.status.success() {
            return Err(TransferError::CommandFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(parse_itemized(&String::from_utf8_lossy(&output.stdout)))
    }
}
