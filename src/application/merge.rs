//! Release Merger
//!
//! Copies the staged tree into `{base}/code/{revision}`. Copy, never move:
//! staging stays intact for the next transfer and a retried merge of the same
//! revision lands on the same bytes. Other releases are never touched.
//!
//! Files the deploy appends to after the merge (the settings file) are reset
//! to their staged state, or removed when staging has none, so a redeploy
//! starts from the same base.

use std::path::{Path, PathBuf};

use crate::domain::ports::HostFs;
use crate::domain::value_objects::{ReleaseLayout, RevisionHash};
use crate::error::{DeployError, DeployResult};

pub struct ReleaseMerger<'a> {
    fs: &'a dyn HostFs,
    layout: &'a ReleaseLayout,
    reset: Vec<PathBuf>,
}

impl<'a> ReleaseMerger<'a> {
    pub fn new(fs: &'a dyn HostFs, layout: &'a ReleaseLayout) -> Self {
        Self {
            fs,
            layout,
            reset: Vec::new(),
        }
    }

    /// Release-relative file written after the merge
    pub fn resetting(mut self, relative: impl Into<PathBuf>) -> Self {
        self.reset.push(relative.into());
        self
    }

    pub fn merge(&self, staging_path: &Path, revision: &RevisionHash) -> DeployResult<PathBuf> {
        let release = self.layout.release_path(revision);
        let fail = |message: String| DeployError::Merge {
            host: self.fs.host().to_string(),
            release: release.clone(),
            message,
        };

        if !self.fs.is_dir(staging_path) {
            return Err(fail(format!(
                "staging directory {} is missing",
                staging_path.display()
            )));
        }

        self.fs
            .create_dir_all(&release)
            .map_err(|e| fail(e.to_string()))?;
        self.fs
            .copy_tree(staging_path, &release)
            .map_err(|e| fail(e.to_string()))?;

        // copy_tree already restored the ones staging has
        for relative in &self.reset {
            if self.fs.exists(&staging_path.join(relative)) {
                continue;
            }
            let target = release.join(relative);
            self.fs
                .remove_file(&target)
                .map_err(|e| fail(format!("resetting {}: {e}", target.display())))?;
        }

        tracing::info!(
            host = self.fs.host(),
            revision = %revision,
            release = %release.display(),
            "merged release"
        );
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::fs::LocalHostFs;
    use std::fs;
    use tempfile::tempdir;

    fn layout(base: &Path) -> ReleaseLayout {
        ReleaseLayout::new(base, "updating", "collected-static", base.join("static"), "c-")
    }

    fn rev(s: &str) -> RevisionHash {
        RevisionHash::parse(s).unwrap()
    }

    #[test]
    fn merge_copies_and_keeps_staging() {
        let dir = tempdir().unwrap();
        let layout = layout(dir.path());
        let staging = layout.staging_path();
        fs::create_dir_all(staging.join("project")).unwrap();
        fs::write(staging.join("project/app.py"), "v1").unwrap();

        let fs_ = LocalHostFs::default();
        let release = ReleaseMerger::new(&fs_, &layout)
            .merge(&staging, &rev("a1b2c3d"))
            .unwrap();

        assert_eq!(release, dir.path().join("code/a1b2c3d"));
        assert_eq!(fs::read_to_string(release.join("project/app.py")).unwrap(), "v1");
        assert!(staging.join("project/app.py").exists());
    }

    #[test]
    fn merge_leaves_other_releases_alone() {
        let dir = tempdir().unwrap();
        let layout = layout(dir.path());
        let staging = layout.staging_path();
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("app.py"), "v2").unwrap();
        fs::create_dir_all(dir.path().join("code/c1")).unwrap();
        fs::write(dir.path().join("code/c1/app.py"), "v1").unwrap();

        let fs_ = LocalHostFs::default();
        ReleaseMerger::new(&fs_, &layout)
            .merge(&staging, &rev("c2"))
            .unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("code/c1/app.py")).unwrap(), "v1");
    }

    #[test]
    fn remerge_restores_modified_files() {
        let dir = tempdir().unwrap();
        let layout = layout(dir.path());
        let staging = layout.staging_path();
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("settings.py"), "BASE\n").unwrap();
        let fs_ = LocalHostFs::default();
        let merger = ReleaseMerger::new(&fs_, &layout);

        let release = merger.merge(&staging, &rev("a1")).unwrap();
        fs::write(release.join("settings.py"), "BASE\nEXTRA\n").unwrap();
        merger.merge(&staging, &rev("a1")).unwrap();

        assert_eq!(fs::read_to_string(release.join("settings.py")).unwrap(), "BASE\n");
    }

    #[test]
    fn remerge_drops_appended_file_missing_from_staging() {
        let dir = tempdir().unwrap();
        let layout = layout(dir.path());
        let staging = layout.staging_path();
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("app.py"), "v1").unwrap();
        let fs_ = LocalHostFs::default();
        let merger = ReleaseMerger::new(&fs_, &layout).resetting("project/settings.py");

        let release = merger.merge(&staging, &rev("a1")).unwrap();
        fs::create_dir_all(release.join("project")).unwrap();
        fs::write(release.join("project/settings.py"), "EXTRA\n").unwrap();
        merger.merge(&staging, &rev("a1")).unwrap();

        assert!(!release.join("project/settings.py").exists());
        assert_eq!(fs::read_to_string(release.join("app.py")).unwrap(), "v1");
    }

    #[test]
    fn missing_staging_is_merge_error() {
        let dir = tempdir().unwrap();
        let layout = layout(dir.path());
        let fs_ = LocalHostFs::default();

        let err = ReleaseMerger::new(&fs_, &layout)
            .merge(&layout.staging_path(), &rev("a1"))
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::Merge);
        assert!(!dir.path().join("code/a1").exists());
    }
}
