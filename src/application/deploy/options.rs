//! Deploy Options
//!
//! Per-invocation settings and the per-host facts the orchestrator needs.

use serde_json::{Map, Value};

use crate::infrastructure::lease::owner_label;

/// Options for one deploy invocation
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Branch, tag or commit to deploy
    pub reference: String,
    /// Resolve and plan only; no host is touched
    pub dry_run: bool,
    /// Recorded in the host lease so a blocked deploy can say who holds it
    pub owner: String,
}

impl DeployOptions {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            dry_run: false,
            owner: owner_label(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }
}

/// Configuration of one target host
#[derive(Debug, Clone, Default)]
pub struct HostSpec {
    pub name: String,
    /// Selects the settings template when one exists under this name
    pub role: Option<String>,
    /// Extra template context for this host
    pub context: Map<String, Value>,
    /// Services restarted after a successful activation
    pub reload: Vec<String>,
}

impl HostSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    pub fn with_reload(mut self, services: Vec<String>) -> Self {
        self.reload = services;
        self
    }
}
