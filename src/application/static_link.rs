//! Static Asset Linker
//!
//! Mirrors a release's static subtree into the shared static directory and
//! points `{shared}/{prefix}{static_hash}` at that subtree. The mirror never
//! deletes entries matching `{prefix}*`, so URLs carrying an older hash keep
//! resolving while the copy runs.

use std::path::{Path, PathBuf};

use crate::domain::ports::{HostFs, SyncSpec};
use crate::domain::value_objects::{ReleaseLayout, StaticHash};
use crate::error::{DeployError, DeployResult};

pub struct StaticAssetLinker<'a> {
    fs: &'a dyn HostFs,
    layout: &'a ReleaseLayout,
}

impl<'a> StaticAssetLinker<'a> {
    pub fn new(fs: &'a dyn HostFs, layout: &'a ReleaseLayout) -> Self {
        Self { fs, layout }
    }

    /// Sync the release's static tree and (re)point its content-hash link
    pub fn link(&self, release_path: &Path, static_hash: &StaticHash) -> DeployResult<PathBuf> {
        let source = self.layout.release_static_dir(release_path);
        let shared = self.layout.shared_static_dir();
        let link = self.layout.static_link(static_hash);
        let fail = |message: String| DeployError::Merge {
            host: self.fs.host().to_string(),
            release: release_path.to_path_buf(),
            message,
        };

        if !self.fs.is_dir(&source) {
            return Err(fail(format!(
                "release has no static directory {}",
                source.display()
            )));
        }

        let spec = SyncSpec::mirror().protecting(format!("{}*", self.layout.cache_prefix()));
        let stats = self
            .fs
            .sync_tree(&source, shared, &spec)
            .map_err(|e| fail(format!("syncing static assets: {e}")))?;
        tracing::debug!(
            host = self.fs.host(),
            transferred = stats.transferred.len(),
            deleted = stats.deleted.len(),
            "static assets synced"
        );

        self.fs
            .replace_symlink(&source, &link)
            .map_err(|e| fail(format!("linking {}: {e}", link.display())))?;

        tracing::info!(
            host = self.fs.host(),
            static_hash = %static_hash,
            link = %link.display(),
            "static assets linked"
        );
        Ok(link)
    }
}
