//! Artifact Transfer
//!
//! Pushes the local build tree into the host's staging directory. The sync
//! mirrors the build (checksum comparison, delete-after) but is scoped to the
//! staging path, so a failure here never touches a release or the active link.

use std::path::Path;

use crate::domain::ports::{FileTransfer, SyncSpec, TransferStats};
use crate::error::{DeployError, DeployResult};

pub struct ArtifactTransfer<'a> {
    transfer: &'a dyn FileTransfer,
    host: &'a str,
}

impl<'a> ArtifactTransfer<'a> {
    pub fn new(transfer: &'a dyn FileTransfer, host: &'a str) -> Self {
        Self { transfer, host }
    }

    pub fn stage(&self, local_build_dir: &Path, staging_path: &Path) -> DeployResult<TransferStats> {
        let fail = |message: String| DeployError::Transfer {
            host: self.host.to_string(),
            staging: staging_path.to_path_buf(),
            message,
        };

        if !local_build_dir.is_dir() {
            return Err(fail(format!(
                "build directory {} does not exist",
                local_build_dir.display()
            )));
        }

        let stats = self
            .transfer
            .push(local_build_dir, staging_path, &SyncSpec::mirror())
            .map_err(|e| fail(e.to_string()))?;

        tracing::info!(
            host = self.host,
            via = self.transfer.name(),
            transferred = stats.transferred.len(),
            deleted = stats.deleted.len(),
            unchanged = stats.unchanged,
            "staged build"
        );
        Ok(stats)
    }
}
