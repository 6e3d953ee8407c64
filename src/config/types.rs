//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::context::{
    DeploymentContext, DEFAULT_CACHE_PREFIX, DEFAULT_SETTINGS_FILE, DEFAULT_SETTINGS_TEMPLATE,
    DEFAULT_STAGING_NAME, DEFAULT_STATIC_SUBDIR,
};
use crate::domain::value_objects::{ConfigWarning, RetentionPolicy};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::hosts::Platform;

use super::loader;

/// `[deploy]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Deployment root on every host; required to deploy
    #[serde(default)]
    pub base_remote_path: Option<PathBuf>,

    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    #[serde(default = "default_static_subdir")]
    pub static_subdir: String,

    #[serde(default = "default_max_keep")]
    pub max_keep: usize,

    #[serde(default = "default_track_static")]
    pub track_static: Vec<PathBuf>,

    #[serde(default = "default_branch")]
    pub default_branch: String,

    #[serde(default = "default_staging_name")]
    pub staging_name: String,

    /// Defaults to `{base_remote_path}/static`
    #[serde(default)]
    pub shared_static_dir: Option<PathBuf>,

    #[serde(default = "default_settings_file")]
    pub settings_file: PathBuf,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    #[serde(default = "default_settings_template")]
    pub settings_template: String,

    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,

    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            base_remote_path: None,
            build_dir: default_build_dir(),
            cache_prefix: default_cache_prefix(),
            static_subdir: default_static_subdir(),
            max_keep: default_max_keep(),
            track_static: default_track_static(),
            default_branch: default_branch(),
            staging_name: default_staging_name(),
            shared_static_dir: None,
            settings_file: default_settings_file(),
            templates_dir: default_templates_dir(),
            settings_template: default_settings_template(),
            lock_ttl_secs: default_lock_ttl_secs(),
            history_file: default_history_file(),
        }
    }
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_cache_prefix() -> String {
    DEFAULT_CACHE_PREFIX.to_string()
}

fn default_static_subdir() -> String {
    DEFAULT_STATIC_SUBDIR.to_string()
}

fn default_max_keep() -> usize {
    RetentionPolicy::DEFAULT_MAX_KEEP
}

fn default_track_static() -> Vec<PathBuf> {
    vec![PathBuf::from("static")]
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_staging_name() -> String {
    DEFAULT_STAGING_NAME.to_string()
}

fn default_settings_file() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_FILE)
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_settings_template() -> String {
    DEFAULT_SETTINGS_TEMPLATE.to_string()
}

fn default_lock_ttl_secs() -> u64 {
    30 * 60
}

fn default_history_file() -> PathBuf {
    PathBuf::from(".shipyard/history.toml")
}

/// `[hosts.<name>]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// ssh destination (`user@host`), or `local` for this machine
    pub address: String,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub platform: Platform,

    /// Run filesystem commands on the host through sudo
    #[serde(default)]
    pub sudo: bool,

    /// Services restarted after activation
    #[serde(default)]
    pub reload: Vec<String>,

    /// Extra values for the settings template
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// Root of `shipyard.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShipyardConfig {
    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,

    /// File this configuration was read from, for error messages
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl ShipyardConfig {
    /// Load `path` (defaults when it does not exist) with environment overrides
    pub fn load(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        let (config, warnings) = if path.exists() {
            loader::load_with_warnings(path)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            (Self::default(), Vec::new())
        };
        Ok((loader::with_env_overrides(config), warnings))
    }

    fn config_error(&self, message: impl Into<String>) -> DeployError {
        DeployError::Config {
            file: self
                .source
                .clone()
                .unwrap_or_else(|| PathBuf::from(loader::CONFIG_FILE)),
            message: message.into(),
        }
    }

    pub fn host(&self, name: &str) -> DeployResult<&HostConfig> {
        self.hosts.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.hosts.keys().map(String::as_str).collect();
            self.config_error(format!(
                "unknown host '{name}' (configured: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            ))
        })
    }

    /// Resolve against `project_root` and validate into an immutable context
    pub fn to_context(&self, project_root: &Path) -> DeployResult<DeploymentContext> {
        let deploy = &self.deploy;
        let base = deploy
            .base_remote_path
            .as_ref()
            .ok_or_else(|| self.config_error("deploy.base_remote_path is not set"))?;
        let retention =
            RetentionPolicy::new(deploy.max_keep).map_err(|e| self.config_error(e.to_string()))?;

        let mut builder = DeploymentContext::builder(base)
            .build_dir(project_root.join(&deploy.build_dir))
            .cache_prefix(&deploy.cache_prefix)
            .static_subdir(&deploy.static_subdir)
            .staging_name(&deploy.staging_name)
            .retention(retention)
            .track_static(deploy.track_static.clone())
            .settings_file(&deploy.settings_file)
            .templates_dir(project_root.join(&deploy.templates_dir))
            .settings_template(&deploy.settings_template)
            .lock_ttl(Duration::from_secs(deploy.lock_ttl_secs));
        if let Some(shared) = &deploy.shared_static_dir {
            builder = builder.shared_static_dir(shared);
        }
        builder.build().map_err(|e| self.config_error(e.to_string()))
    }

    pub fn history_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.deploy.history_file)
    }
}
