//! Retention planner
//!
//! Pure selection of release directories to delete. Candidates are ordered
//! oldest first by modification time, ties broken by name so retries pick the
//! same victims. Protected names (the active release and the one being
//! deployed) are never candidates, whatever their timestamps say.

use std::collections::HashSet;
use std::time::SystemTime;

use crate::domain::value_objects::RetentionPolicy;

/// A release directory as seen on a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub name: String,
    pub modified: SystemTime,
}

impl ReleaseEntry {
    pub fn new(name: impl Into<String>, modified: SystemTime) -> Self {
        Self {
            name: name.into(),
            modified,
        }
    }
}

/// Outcome of planning: what to delete, what stays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrunePlan {
    /// Names to delete, in deletion order
    pub remove: Vec<String>,
    /// Names that remain, oldest first
    pub keep: Vec<String>,
    /// Releases still above budget because only protected ones are left
    pub over_budget: usize,
}

impl PrunePlan {
    pub fn is_noop(&self) -> bool {
        self.remove.is_empty()
    }
}

pub fn plan_prune(
    entries: &[ReleaseEntry],
    protected: &[&str],
    policy: RetentionPolicy,
) -> PrunePlan {
    let protected: HashSet<&str> = protected.iter().copied().collect();

    let mut ordered: Vec<&ReleaseEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)));

    let mut excess = policy.excess(ordered.len());
    let mut plan = PrunePlan::default();

    for entry in ordered {
        if excess > 0 && !protected.contains(entry.name.as_str()) {
            plan.remove.push(entry.name.clone());
            excess -= 1;
        } else {
            plan.keep.push(entry.name.clone());
        }
    }
    plan.over_budget = excess;
    plan
}
