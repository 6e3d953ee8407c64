//! Local Transfer
//!
//! Pushes a build tree to a directory on this machine with the same
//! semantics as `RsyncTransfer`. Used for `local` hosts.

use std::path::Path;

use super::tree::sync_tree;
use crate::domain::ports::{FileTransfer, SyncSpec, TransferError, TransferStats};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransfer;

impl LocalTransfer {
    pub fn new() -> Self {
        Self
    }
}

impl FileTransfer for LocalTransfer {
    fn name(&self) -> &'static str {
        "local"
    }

    fn push(
        &self,
        local_dir: &Path,
        remote_dir: &Path,
        spec: &SyncSpec,
    ) -> Result<TransferStats, TransferError> {
        sync_tree(local_dir, remote_dir, spec)
    }
}
