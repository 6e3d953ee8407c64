//! Retention Pruner
//!
//! Deletes the oldest release directories until at most `max_keep` remain,
//! and sweeps static links whose release is gone. The active release is read
//! from the host and always excluded, whatever its timestamp.
//!
//! Errors here are `DeployError::Prune`, which the orchestrator logs and
//! steps over.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::domain::ports::HostFs;
use crate::domain::services::{plan_prune, PrunePlan, ReleaseEntry};
use crate::domain::value_objects::{ReleaseLayout, RetentionPolicy};
use crate::error::{DeployError, DeployResult};

use super::activate::current_release;

/// Releases deleted by one prune pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub removed: Vec<String>,
    pub kept: Vec<String>,
    /// Releases above budget that could not be removed because they are protected
    pub over_budget: usize,
}

pub struct RetentionPruner<'a> {
    fs: &'a dyn HostFs,
    layout: &'a ReleaseLayout,
    policy: RetentionPolicy,
}

impl<'a> RetentionPruner<'a> {
    pub fn new(fs: &'a dyn HostFs, layout: &'a ReleaseLayout, policy: RetentionPolicy) -> Self {
        Self { fs, layout, policy }
    }

    fn error(&self, path: PathBuf, message: String) -> DeployError {
        DeployError::Prune {
            host: self.fs.host().to_string(),
            path,
            message,
        }
    }

    fn entries(&self) -> DeployResult<Vec<ReleaseEntry>> {
        let root = self.layout.release_root();
        Ok(self
            .fs
            .list_dirs(&root)
            .map_err(|e| self.error(root.clone(), e.to_string()))?
            .into_iter()
            .map(|d| ReleaseEntry::new(d.name, d.modified))
            .collect())
    }

    fn plan_entries(&self, entries: &[ReleaseEntry], also_keep: &[&str]) -> DeployResult<PrunePlan> {
        // Without knowing the active release nothing is safe to delete
        let active = current_release(self.fs, self.layout)
            .map_err(|e| self.error(self.layout.active_link(), e.to_string()))?;

        let mut protected: Vec<&str> = also_keep.to_vec();
        if let Some(active) = active.as_deref() {
            protected.push(active);
        }
        Ok(plan_prune(entries, &protected, self.policy))
    }

    /// Decide what a prune would delete, protecting `also_keep` besides the active release
    pub fn plan(&self, also_keep: &[&str]) -> DeployResult<PrunePlan> {
        self.plan_entries(&self.entries()?, also_keep)
    }

    /// Plan as if `incoming` had already been merged (for dry runs)
    pub fn plan_with_incoming(&self, incoming: &str) -> DeployResult<PrunePlan> {
        let mut entries = self.entries()?;
        if !entries.iter().any(|e| e.name == incoming) {
            entries.push(ReleaseEntry::new(incoming, SystemTime::now()));
        }
        self.plan_entries(&entries, &[incoming])
    }

    pub fn prune(&self, also_keep: &[&str]) -> DeployResult<PruneOutcome> {
        let plan = self.plan(also_keep)?;
        let root = self.layout.release_root();

        let mut outcome = PruneOutcome {
            kept: plan.keep.clone(),
            over_budget: plan.over_budget,
            ..Default::default()
        };
        for name in &plan.remove {
            let path = root.join(name);
            self.fs
                .remove_dir_all(&path)
                .map_err(|e| self.error(path.clone(), e.to_string()))?;
            tracing::info!(host = self.fs.host(), release = %name, "pruned release");
            outcome.removed.push(name.clone());
        }

        if plan.over_budget > 0 {
            tracing::warn!(
                host = self.fs.host(),
                max_keep = self.policy.max_keep(),
                over_budget = plan.over_budget,
                "only protected releases left; keeping more than max_keep"
            );
        }
        Ok(outcome)
    }

    /// Remove static links whose target no longer exists
    pub fn sweep_orphan_links(&self) -> DeployResult<Vec<PathBuf>> {
        let shared = self.layout.shared_static_dir();
        let removed = self
            .fs
            .remove_dangling_links(shared)
            .map_err(|e| self.error(shared.to_path_buf(), e.to_string()))?;
        for link in &removed {
            tracing::info!(host = self.fs.host(), link = %link.display(), "removed orphan link");
        }
        Ok(removed)
    }
}
