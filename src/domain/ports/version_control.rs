//! VersionControl port - turning a ref into content identities
//!
//! Implemented by `GitRepository` (libgit2). Tests use fixed-answer fakes.

use std::path::PathBuf;

use crate::domain::value_objects::{RevisionHash, StaticHash};

#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("reference '{reference}' not found: {message}")]
    UnknownReference { reference: String, message: String },

    #[error("no commit on '{reference}' touches {}", format_paths(.paths))]
    NoHistory {
        reference: String,
        paths: Vec<PathBuf>,
    },

    #[error("repository error: {0}")]
    Backend(String),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait VersionControl: Send + Sync {
    /// Short, stable identifier of the commit `reference` points at
    fn resolve(&self, reference: &str) -> Result<RevisionHash, VcsError>;

    /// Identifier over only `paths`: the most recent commit reachable from
    /// `reference` that touched any of them
    fn content_hash(&self, reference: &str, paths: &[PathBuf]) -> Result<StaticHash, VcsError>;
}
