//! FileTransfer port - moving a local tree to a host
//!
//! Differential, checksum-based copy. Implementations:
//! - `RsyncTransfer` - rsync over ssh (preferred for real hosts)
//! - `LocalTransfer` - in-process sync for `local` hosts and tests

use std::path::{Path, PathBuf};

/// What happens to destination files absent from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Never delete anything on the destination
    #[default]
    Keep,
    /// Delete extraneous destination files once the copy has finished
    DeleteAfter,
}

/// Options for one tree synchronization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSpec {
    pub delete: DeleteMode,
    /// Compare by content checksum rather than size + mtime
    pub checksum: bool,
    /// Glob patterns (rsync `P` filter rules) protected from deletion
    pub protect: Vec<String>,
}

impl SyncSpec {
    /// Mirror: checksum compare, delete-after, nothing protected
    pub fn mirror() -> Self {
        Self {
            delete: DeleteMode::DeleteAfter,
            checksum: true,
            protect: Vec::new(),
        }
    }

    /// Copy-only: checksum compare, never delete
    pub fn overlay() -> Self {
        Self {
            delete: DeleteMode::Keep,
            checksum: true,
            protect: Vec::new(),
        }
    }

    pub fn protecting(mut self, pattern: impl Into<String>) -> Self {
        self.protect.push(pattern.into());
        self
    }
}

/// What a sync changed, relative to the destination root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub transferred: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub unchanged: usize,
}

impl TransferStats {
    pub fn has_changes(&self) -> bool {
        !self.transferred.is_empty() || !self.deleted.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("no transfer method available: {0}")]
    Unavailable(String),

    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),

    #[error("checksum mismatch after copying {0}")]
    ChecksumMismatch(PathBuf),

    #[error("transfer command failed with exit code {code:?}: {stderr}")]
    CommandFailed { code: Option<i32>, stderr: String },

    #[error("invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        TransferError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub trait FileTransfer: Send + Sync {
    /// Name of this transfer method (for logging)
    fn name(&self) -> &'static str;

    /// Push the contents of `local_dir` into `remote_dir` on the bound host
    fn push(
        &self,
        local_dir: &Path,
        remote_dir: &Path,
        spec: &SyncSpec,
    ) -> Result<TransferStats, TransferError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_deletes_after() {
        let spec = SyncSpec::mirror();
        assert_eq!(spec.delete, DeleteMode::DeleteAfter);
        assert!(spec.checksum);
    }

    #[test]
    fn protecting_appends_patterns() {
        let spec = SyncSpec::mirror().protecting("c-*");
        assert_eq!(spec.protect, vec!["c-*".to_string()]);
    }
}
