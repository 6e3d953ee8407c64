//! HostFs port - filesystem operations on a deployment host
//!
//! Every mutation the engine makes on a host goes through this trait, so the
//! release logic is identical for a remote host and for a local directory.
//!
//! Implementations:
//! - `LocalHostFs` - standard `std::fs` operations
//! - `RemoteHostFs` - shell commands through a `RemoteExecutor`

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::executor::ExecError;
use super::file_transfer::{SyncSpec, TransferError, TransferStats};

/// Result type for host filesystem operations
pub type FsResult<T> = Result<T, FsError>;

/// Host filesystem errors
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Command(#[from] ExecError),

    #[error(transparent)]
    Sync(#[from] TransferError),

    #[error("unexpected output from host: {0}")]
    Parse(String),
}

impl FsError {
    /// Attach a path to an `io::Error`, keeping the common kinds distinguishable
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// An immediate subdirectory with its modification time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirInfo {
    pub name: String,
    pub modified: SystemTime,
}

pub trait HostFs: Send + Sync {
    /// Host these operations apply to
    fn host(&self) -> &str;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Create a single directory atomically. Returns `false` if it already existed.
    fn create_dir_exclusive(&self, path: &Path) -> FsResult<bool>;

    /// Copy the contents of `src` into `dst` (created if absent), overwriting
    /// files that differ. Never moves, never deletes. A newly created `dst`
    /// carries the time of the copy, not the time of `src`.
    fn copy_tree(&self, src: &Path, dst: &Path) -> FsResult<()>;

    /// Host-local differential sync from `src` into `dst`
    fn sync_tree(&self, src: &Path, dst: &Path, spec: &SyncSpec) -> FsResult<TransferStats>;

    /// Immediate subdirectories of `path` (symlinks excluded)
    fn list_dirs(&self, path: &Path) -> FsResult<Vec<DirInfo>>;

    fn remove_dir_all(&self, path: &Path) -> FsResult<()>;

    /// Delete a file; a missing file is not an error
    fn remove_file(&self, path: &Path) -> FsResult<()>;

    /// Target of a symlink, or `None` if `path` is not a symlink
    fn read_link(&self, path: &Path) -> FsResult<Option<PathBuf>>;

    /// Point `link` at `target` so readers see either the old or the new
    /// target and never a missing link.
    fn replace_symlink(&self, target: &Path, link: &Path) -> FsResult<()>;

    /// Delete symlinks directly inside `dir` whose target does not exist
    fn remove_dangling_links(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;

    fn read_to_string(&self, path: &Path) -> FsResult<String>;

    /// Write content, creating parent directories
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Append content, creating the file if needed
    fn append(&self, path: &Path, content: &str) -> FsResult<()>;

    fn modified(&self, path: &Path) -> FsResult<SystemTime>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_error_display() {
        let err = FsError::NotFound(PathBuf::from("/srv/app/code"));
        assert!(err.to_string().contains("/srv/app/code"));
    }

    #[test]
    fn fs_error_from_io_keeps_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let fs_err = FsError::io(Path::new("x"), io_err);
        assert!(matches!(fs_err, FsError::NotFound(p) if p == Path::new("x")));
    }
}
