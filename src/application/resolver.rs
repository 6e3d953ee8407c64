//! Content Version Resolver
//!
//! Turns a branch or tag into the two identities a deploy is keyed by: the
//! revision hash (names the release directory) and the static hash (names
//! the content-addressed static link).
//!
//! A prepared build directory carries `CVERSION`/`VERSION` stamps. When they
//! are present they must agree with what the ref resolves to now, otherwise
//! the artifacts on disk were built from different sources.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ports::{VcsError, VersionControl};
use crate::domain::value_objects::{RevisionHash, StaticHash};
use crate::error::{DeployError, DeployResult};

/// Stamp holding the static hash of a prepared build
pub const VERSION_STAMP: &str = "VERSION";
/// Stamp holding the revision hash of a prepared build
pub const CODE_VERSION_STAMP: &str = "CVERSION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub revision: RevisionHash,
    pub static_hash: StaticHash,
}

pub struct ContentVersionResolver<'a> {
    vcs: &'a dyn VersionControl,
}

impl<'a> ContentVersionResolver<'a> {
    pub fn new(vcs: &'a dyn VersionControl) -> Self {
        Self { vcs }
    }

    pub fn resolve(&self, reference: &str, tracked: &[PathBuf]) -> DeployResult<ResolvedVersion> {
        let revision = self
            .vcs
            .resolve(reference)
            .map_err(|e| resolution_error(reference, e))?;
        let static_hash = self
            .vcs
            .content_hash(reference, tracked)
            .map_err(|e| resolution_error(reference, e))?;

        tracing::debug!(
            reference,
            revision = %revision,
            static_hash = %static_hash,
            "resolved content versions"
        );
        Ok(ResolvedVersion {
            revision,
            static_hash,
        })
    }

    /// Resolve, then refuse a build directory stamped for another version
    pub fn resolve_for_build(
        &self,
        reference: &str,
        tracked: &[PathBuf],
        build_dir: &Path,
    ) -> DeployResult<ResolvedVersion> {
        let version = self.resolve(reference, tracked)?;
        check_stamp(
            build_dir,
            CODE_VERSION_STAMP,
            version.revision.as_str(),
            reference,
        )?;
        check_stamp(
            build_dir,
            VERSION_STAMP,
            version.static_hash.as_str(),
            reference,
        )?;
        Ok(version)
    }
}

fn resolution_error(reference: &str, err: VcsError) -> DeployError {
    DeployError::Resolution {
        reference: reference.to_string(),
        message: err.to_string(),
    }
}

/// Read a stamp file; missing stamps are `None`
pub fn read_stamp(build_dir: &Path, name: &str) -> std::io::Result<Option<String>> {
    match fs::read_to_string(build_dir.join(name)) {
        Ok(s) => Ok(Some(s.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

fn check_stamp(build_dir: &Path, name: &str, expected: &str, reference: &str) -> DeployResult<()> {
    let stamped = read_stamp(build_dir, name).map_err(|e| DeployError::Resolution {
        reference: reference.to_string(),
        message: format!("cannot read {}: {e}", build_dir.join(name).display()),
    })?;
    match stamped {
        Some(found) if found != expected => Err(DeployError::Resolution {
            reference: reference.to_string(),
            message: format!(
                "stale build: {} says {found} but the reference resolves to {expected}; run `shipyard prep`",
                build_dir.join(name).display()
            ),
        }),
        _ => Ok(()),
    }
}
