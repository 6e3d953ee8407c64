//! Per-invocation project state shared by the command handlers

use std::path::{Path, PathBuf};

use anyhow::Result;

use shipyard::application::HostSpec;
use shipyard::config::{ShipyardConfig, CONFIG_FILE};
use shipyard::domain::context::DeploymentContext;
use shipyard::infrastructure::{GitRepository, HostSession, TomlHistoryRepository};

use super::project_root::discover_project_root;

pub(crate) struct Workspace {
    pub project_root: PathBuf,
    pub config: ShipyardConfig,
}

impl Workspace {
    /// Find the project, read its configuration and print any config warnings
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let project_root = discover_project_root(&cwd);
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_root.join(CONFIG_FILE));

        let (config, warnings) = ShipyardConfig::load(&path)?;
        for warning in &warnings {
            eprintln!("Warning: {warning}");
        }
        tracing::debug!(root = %project_root.display(), config = %path.display(), "workspace loaded");
        Ok(Self {
            project_root,
            config,
        })
    }

    pub fn context(&self) -> Result<DeploymentContext> {
        Ok(self.config.to_context(&self.project_root)?)
    }

    pub fn repository(&self) -> Result<GitRepository> {
        Ok(GitRepository::discover(&self.project_root)?)
    }

    pub fn history(&self) -> TomlHistoryRepository {
        TomlHistoryRepository::new(self.config.history_path(&self.project_root))
    }

    /// `--branch`, else `deploy.default_branch` (after SHIPYARD_BRANCH)
    pub fn reference(&self, flag: Option<String>) -> String {
        flag.unwrap_or_else(|| self.config.deploy.default_branch.clone())
    }

    /// Every configured host when none are named
    pub fn host_names(&self, requested: Vec<String>) -> Vec<String> {
        if requested.is_empty() {
            self.config.hosts.keys().cloned().collect()
        } else {
            requested
        }
    }

    pub fn session(&self, name: &str) -> Result<HostSession> {
        let host = self.config.host(name)?;
        Ok(HostSession::connect(
            name,
            &host.address,
            host.platform,
            host.sudo,
        ))
    }

    pub fn host_spec(&self, name: &str) -> Result<HostSpec> {
        let host = self.config.host(name)?;
        let mut spec = HostSpec::new(name)
            .with_context(host.context.clone())
            .with_reload(host.reload.clone());
        if let Some(role) = &host.role {
            spec = spec.with_role(role);
        }
        Ok(spec)
    }
}
