//! Git adapter for content identities.
//!
//! The revision hash is the abbreviated id of the commit a ref points at.
//! The static hash is the abbreviated id of the newest commit reachable from
//! that ref which touched any tracked static path, so two revisions that
//! leave the static sources alone share one static hash.

use std::path::{Path, PathBuf};

use git2::{Commit, DiffOptions, Oid, Repository};

use crate::domain::ports::{VcsError, VersionControl};
use crate::domain::value_objects::{RevisionHash, StaticHash};

/// A local git checkout, opened per call so the adapter stays `Sync`
#[derive(Debug, Clone)]
pub struct GitRepository {
    path: PathBuf,
}

impl GitRepository {
    /// Discover the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self, VcsError> {
        let repo = Repository::discover(path).map_err(backend)?;
        let root = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        Ok(Self { path: root })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Repository, VcsError> {
        Repository::open(&self.path).map_err(backend)
    }

    fn peel<'r>(repo: &'r Repository, reference: &str) -> Result<Commit<'r>, VcsError> {
        repo.revparse_single(reference)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| VcsError::UnknownReference {
                reference: reference.to_string(),
                message: e.message().to_string(),
            })
    }
}

fn backend(err: git2::Error) -> VcsError {
    VcsError::Backend(err.message().to_string())
}

fn short_id(repo: &Repository, oid: Oid) -> Result<String, VcsError> {
    let object = repo.find_object(oid, None).map_err(backend)?;
    let buf = object.short_id().map_err(backend)?;
    buf.as_str()
        .map(str::to_string)
        .ok_or_else(|| VcsError::Backend(format!("abbreviated id of {oid} is not UTF-8")))
}

fn commit_touches_paths(
    repo: &Repository,
    commit: &Commit,
    paths: &[PathBuf],
) -> Result<bool, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let mut diff_opts = DiffOptions::new();
    for path in paths {
        diff_opts.pathspec(path);
    }

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut diff_opts))?;
    Ok(diff.deltas().len() > 0)
}

impl VersionControl for GitRepository {
    fn resolve(&self, reference: &str) -> Result<RevisionHash, VcsError> {
        let repo = self.open()?;
        let commit = Self::peel(&repo, reference)?;
        let short = short_id(&repo, commit.id())?;
        RevisionHash::parse(&short).map_err(|e| VcsError::Backend(e.to_string()))
    }

    fn content_hash(&self, reference: &str, paths: &[PathBuf]) -> Result<StaticHash, VcsError> {
        let repo = self.open()?;
        let head = Self::peel(&repo, reference)?;

        let mut revwalk = repo.revwalk().map_err(backend)?;
        revwalk.push(head.id()).map_err(backend)?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(backend)?;

        for oid in revwalk {
            let oid = oid.map_err(backend)?;
            let commit = repo.find_commit(oid).map_err(backend)?;
            if commit_touches_paths(&repo, &commit, paths).map_err(backend)? {
                tracing::debug!(
                    reference,
                    commit = %oid,
                    "static sources last changed"
                );
                let short = short_id(&repo, oid)?;
                return StaticHash::parse(&short).map_err(|e| VcsError::Backend(e.to_string()));
            }
        }

        Err(VcsError::NoHistory {
            reference: reference.to_string(),
            paths: paths.to_vec(),
        })
    }
}
