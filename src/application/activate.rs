//! Activation Switch
//!
//! Repoints `{base}/active` at a release. The link is replaced by renaming a
//! freshly written link over it, so readers see the old or the new target and
//! never a missing one.

use std::path::{Path, PathBuf};

use crate::domain::ports::{FsResult, HostFs};
use crate::domain::value_objects::ReleaseLayout;
use crate::error::{DeployError, DeployResult};

/// What an activation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub release: PathBuf,
    /// Release name the active link pointed at before, if any
    pub previous: Option<String>,
    /// `false` when the link already pointed at the release
    pub changed: bool,
}

/// Name of the release the active link currently points at
pub fn current_release(fs: &dyn HostFs, layout: &ReleaseLayout) -> FsResult<Option<String>> {
    Ok(fs
        .read_link(&layout.active_link())?
        .and_then(|target| layout.revision_of_target(&target)))
}

pub struct ActivationSwitch<'a> {
    fs: &'a dyn HostFs,
    layout: &'a ReleaseLayout,
}

impl<'a> ActivationSwitch<'a> {
    pub fn new(fs: &'a dyn HostFs, layout: &'a ReleaseLayout) -> Self {
        Self { fs, layout }
    }

    pub fn activate(&self, release_path: &Path) -> DeployResult<Activation> {
        let fail = |message: String| DeployError::Activation {
            host: self.fs.host().to_string(),
            release: release_path.to_path_buf(),
            message,
        };

        if !self.fs.is_dir(release_path) {
            return Err(fail("release directory does not exist".to_string()));
        }

        let link = self.layout.active_link();
        let target = self.layout.active_target(release_path);
        let current_target = self
            .fs
            .read_link(&link)
            .map_err(|e| fail(format!("reading {}: {e}", link.display())))?;
        let previous = current_target
            .as_deref()
            .and_then(|t| self.layout.revision_of_target(t));

        if current_target.as_deref() == Some(target.as_path()) {
            tracing::info!(
                host = self.fs.host(),
                release = %release_path.display(),
                "already active"
            );
            return Ok(Activation {
                release: release_path.to_path_buf(),
                previous,
                changed: false,
            });
        }

        self.fs
            .replace_symlink(&target, &link)
            .map_err(|e| fail(e.to_string()))?;

        tracing::info!(
            host = self.fs.host(),
            release = %release_path.display(),
            previous = previous.as_deref().unwrap_or("-"),
            "activated"
        );
        Ok(Activation {
            release: release_path.to_path_buf(),
            previous,
            changed: true,
        })
    }
}
