//! Per-host deploy lease
//!
//! A directory at `{base}/.deploy.lock`, created with a single atomic `mkdir`
//! on the host itself so two machines deploying to the same host exclude each
//! other. The lease holds an `owner` file naming who took it. A lease older
//! than its TTL is considered abandoned and reclaimed.
//!
//! The lease is released when dropped, so every exit path of a deploy frees it.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Utc;

use crate::domain::ports::{FsError, HostFs};

const OWNER_FILE: &str = "owner";

#[derive(Debug, thiserror::Error)]
pub enum LeaseError {
    #[error("held by {owner} for {}s", age.as_secs())]
    Held { owner: String, age: Duration },

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Identifies the process taking a lease
pub fn owner_label() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!(
        "{user} pid {} since {}",
        std::process::id(),
        Utc::now().to_rfc3339()
    )
}

pub struct DeployLease<'a> {
    fs: &'a dyn HostFs,
    path: PathBuf,
    released: bool,
}

impl<'a> DeployLease<'a> {
    pub fn acquire(
        fs: &'a dyn HostFs,
        path: &Path,
        owner: &str,
        ttl: Duration,
    ) -> Result<Self, LeaseError> {
        if !fs.create_dir_exclusive(path)? {
            let age = fs
                .modified(path)
                .ok()
                .and_then(|m| SystemTime::now().duration_since(m).ok())
                .unwrap_or_default();
            let holder = fs
                .read_to_string(&path.join(OWNER_FILE))
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "unknown owner".to_string());

            if age < ttl {
                return Err(LeaseError::Held { owner: holder, age });
            }

            tracing::warn!(
                host = fs.host(),
                path = %path.display(),
                holder = %holder,
                age_secs = age.as_secs(),
                "reclaiming stale deploy lease"
            );
            fs.remove_dir_all(path)?;
            if !fs.create_dir_exclusive(path)? {
                return Err(LeaseError::Held {
                    owner: "a concurrent deploy".to_string(),
                    age: Duration::ZERO,
                });
            }
        }

        let lease = Self {
            fs,
            path: path.to_path_buf(),
            released: false,
        };
        fs.write(&path.join(OWNER_FILE), &format!("{owner}\n"))?;
        tracing::debug!(host = fs.host(), path = %path.display(), "deploy lease acquired");
        Ok(lease)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release explicitly, surfacing the error instead of logging it
    pub fn release(mut self) -> Result<(), FsError> {
        self.released = true;
        self.fs.remove_dir_all(&self.path)
    }
}

impl Drop for DeployLease<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.fs.remove_dir_all(&self.path) {
            tracing::warn!(
                host = self.fs.host(),
                path = %self.path.display(),
                error = %e,
                "failed to release deploy lease"
            );
        }
    }
}
