//! Release layout value object
//!
//! The persisted filesystem contract on every host:
//!
//! ```text
//! {base}/
//!   code/{revision}/...              one directory per release
//!   active -> code/{revision}        the active pointer
//!   updating/                        staging area for transfers
//!   .deploy.lock/                    per-host deploy lease
//!   static/{prefix}{static_hash} -> {base}/code/{revision}/{static_subdir}
//! ```

use std::path::{Path, PathBuf};

use super::hash::{RevisionHash, StaticHash};

pub const CODE_DIR: &str = "code";
pub const ACTIVE_LINK: &str = "active";
pub const LOCK_DIR: &str = ".deploy.lock";

/// Path arithmetic for one deployment root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLayout {
    base: PathBuf,
    staging_name: String,
    static_subdir: String,
    shared_static_dir: PathBuf,
    cache_prefix: String,
}

impl ReleaseLayout {
    pub fn new(
        base: impl Into<PathBuf>,
        staging_name: impl Into<String>,
        static_subdir: impl Into<String>,
        shared_static_dir: impl Into<PathBuf>,
        cache_prefix: impl Into<String>,
    ) -> Self {
        Self {
            base: base.into(),
            staging_name: staging_name.into(),
            static_subdir: static_subdir.into(),
            shared_static_dir: shared_static_dir.into(),
            cache_prefix: cache_prefix.into(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory holding every release (`{base}/code`)
    pub fn release_root(&self) -> PathBuf {
        self.base.join(CODE_DIR)
    }

    pub fn release_path(&self, revision: &RevisionHash) -> PathBuf {
        self.release_root().join(revision.as_str())
    }

    pub fn active_link(&self) -> PathBuf {
        self.base.join(ACTIVE_LINK)
    }

    pub fn staging_path(&self) -> PathBuf {
        self.base.join(&self.staging_name)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.base.join(LOCK_DIR)
    }

    pub fn shared_static_dir(&self) -> &Path {
        &self.shared_static_dir
    }

    pub fn cache_prefix(&self) -> &str {
        &self.cache_prefix
    }

    /// Static subtree inside a release
    pub fn release_static_dir(&self, release_path: &Path) -> PathBuf {
        release_path.join(&self.static_subdir)
    }

    pub fn static_link(&self, static_hash: &StaticHash) -> PathBuf {
        self.shared_static_dir
            .join(static_hash.link_name(&self.cache_prefix))
    }

    /// Target to store in the active link: relative when the release lives under base
    pub fn active_target(&self, release_path: &Path) -> PathBuf {
        release_path
            .strip_prefix(&self.base)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| release_path.to_path_buf())
    }

    /// Resolve a stored active-link target back to the release directory name
    pub fn revision_of_target(&self, target: &Path) -> Option<String> {
        let absolute = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.base.join(target)
        };
        let parent = absolute.parent()?;
        if parent != self.release_root() {
            return None;
        }
        absolute
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }
}
