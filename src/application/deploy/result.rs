//! Deploy Result
//!
//! Result types for deploy operations.

use std::path::PathBuf;

use chrono::Utc;

use crate::domain::phase::DeployPhase;
use crate::domain::ports::{DeployRecord, TransferStats};
use crate::domain::services::PrunePlan;
use crate::domain::value_objects::{RevisionHash, StaticHash};
use crate::error::{DeployError, ErrorKind};

/// What a dry run would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunPlan {
    pub staging_path: PathBuf,
    pub release_path: PathBuf,
    pub static_link: PathBuf,
    pub active: Option<String>,
    pub prune: PrunePlan,
}

/// Outcome of deploying to one host
#[derive(Debug)]
pub struct DeployReport {
    pub host: String,
    pub reference: String,
    pub revision_hash: Option<RevisionHash>,
    pub static_hash: Option<StaticHash>,
    /// Release directory, once merged
    pub release_path: Option<PathBuf>,
    /// Active points at this deploy's release
    pub activated: bool,
    /// Last phase entered (`Done` or `Failed` unless this was a dry run)
    pub phase: DeployPhase,
    /// Phase that failed, if any
    pub failed_in: Option<DeployPhase>,
    pub error: Option<DeployError>,
    /// Non-fatal problems (pruning, service reloads)
    pub warnings: Vec<String>,
    pub transfer: Option<TransferStats>,
    pub pruned: Vec<String>,
    pub swept: Vec<PathBuf>,
    pub plan: Option<DryRunPlan>,
}

impl DeployReport {
    pub fn new(host: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            reference: reference.into(),
            revision_hash: None,
            static_hash: None,
            release_path: None,
            activated: false,
            phase: DeployPhase::Resolving,
            failed_in: None,
            error: None,
            warnings: Vec::new(),
            transfer: None,
            pruned: Vec::new(),
            swept: Vec::new(),
            plan: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(DeployError::kind)
    }

    pub fn to_record(&self) -> DeployRecord {
        DeployRecord {
            host: self.host.clone(),
            reference: self.reference.clone(),
            revision: self.revision_hash.as_ref().map(|r| r.to_string()),
            static_hash: self.static_hash.as_ref().map(|s| s.to_string()),
            activated: self.activated,
            error: self.error_kind(),
            finished_at: Utc::now(),
        }
    }
}
