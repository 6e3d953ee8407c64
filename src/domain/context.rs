//! Deployment context
//!
//! Resolved once per deploy invocation and passed by reference into every
//! component. There is no global deployment state.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::value_objects::{ReleaseLayout, RetentionPolicy};

pub const DEFAULT_CACHE_PREFIX: &str = "c-";
pub const DEFAULT_STATIC_SUBDIR: &str = "collected-static";
pub const DEFAULT_STAGING_NAME: &str = "updating";
pub const DEFAULT_SETTINGS_FILE: &str = "project/settings/__init__.py";
pub const DEFAULT_SETTINGS_TEMPLATE: &str = "base_settings";
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(30 * 60);

/// Why a context could not be built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("base path '{0}' must be absolute")]
    RelativeBase(PathBuf),
    #[error("cache prefix must not be empty")]
    EmptyCachePrefix,
    #[error("'{field}' must be a single path component, got '{value}'")]
    NotAComponent { field: &'static str, value: String },
    #[error("at least one tracked static path is required")]
    NoTrackedPaths,
}

/// Immutable configuration for one deploy
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    layout: ReleaseLayout,
    build_dir: PathBuf,
    retention: RetentionPolicy,
    track_static: Vec<PathBuf>,
    settings_file: PathBuf,
    templates_dir: PathBuf,
    settings_template: String,
    lock_ttl: Duration,
}

impl DeploymentContext {
    pub fn builder(base: impl Into<PathBuf>) -> DeploymentContextBuilder {
        DeploymentContextBuilder::new(base)
    }

    pub fn layout(&self) -> &ReleaseLayout {
        &self.layout
    }

    pub fn base(&self) -> &Path {
        self.layout.base()
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn cache_prefix(&self) -> &str {
        self.layout.cache_prefix()
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    pub fn track_static(&self) -> &[PathBuf] {
        &self.track_static
    }

    /// Settings file inside a release that host configuration is appended to
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn settings_template(&self) -> &str {
        &self.settings_template
    }

    pub fn lock_ttl(&self) -> Duration {
        self.lock_ttl
    }
}

/// Builder for [`DeploymentContext`]; `build()` validates every field
#[derive(Debug, Clone)]
pub struct DeploymentContextBuilder {
    base: PathBuf,
    build_dir: PathBuf,
    cache_prefix: String,
    static_subdir: String,
    staging_name: String,
    shared_static_dir: Option<PathBuf>,
    retention: RetentionPolicy,
    track_static: Vec<PathBuf>,
    settings_file: PathBuf,
    templates_dir: PathBuf,
    settings_template: String,
    lock_ttl: Duration,
}

impl DeploymentContextBuilder {
    fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            build_dir: PathBuf::from("build"),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            static_subdir: DEFAULT_STATIC_SUBDIR.to_string(),
            staging_name: DEFAULT_STAGING_NAME.to_string(),
            shared_static_dir: None,
            retention: RetentionPolicy::default(),
            track_static: vec![PathBuf::from("static")],
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
            templates_dir: PathBuf::from("templates"),
            settings_template: DEFAULT_SETTINGS_TEMPLATE.to_string(),
            lock_ttl: DEFAULT_LOCK_TTL,
        }
    }

    pub fn build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    pub fn cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_prefix = prefix.into();
        self
    }

    pub fn static_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.static_subdir = subdir.into();
        self
    }

    pub fn staging_name(mut self, name: impl Into<String>) -> Self {
        self.staging_name = name.into();
        self
    }

    pub fn shared_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shared_static_dir = Some(dir.into());
        self
    }

    pub fn retention(mut self, policy: RetentionPolicy) -> Self {
        self.retention = policy;
        self
    }

    pub fn track_static(mut self, paths: Vec<PathBuf>) -> Self {
        self.track_static = paths;
        self
    }

    pub fn settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = path.into();
        self
    }

    pub fn templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    pub fn settings_template(mut self, name: impl Into<String>) -> Self {
        self.settings_template = name.into();
        self
    }

    pub fn lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<DeploymentContext, ContextError> {
        if !self.base.is_absolute() {
            return Err(ContextError::RelativeBase(self.base));
        }
        if self.cache_prefix.is_empty() {
            return Err(ContextError::EmptyCachePrefix);
        }
        single_component("static_subdir", &self.static_subdir)?;
        single_component("staging_name", &self.staging_name)?;
        if self.track_static.is_empty() {
            return Err(ContextError::NoTrackedPaths);
        }

        let shared_static_dir = self
            .shared_static_dir
            .unwrap_or_else(|| self.base.join("static"));
        let layout = ReleaseLayout::new(
            self.base,
            self.staging_name,
            self.static_subdir,
            shared_static_dir,
            self.cache_prefix,
        );

        Ok(DeploymentContext {
            layout,
            build_dir: self.build_dir,
            retention: self.retention,
            track_static: self.track_static,
            settings_file: self.settings_file,
            templates_dir: self.templates_dir,
            settings_template: self.settings_template,
            lock_ttl: self.lock_ttl,
        })
    }
}

fn single_component(field: &'static str, value: &str) -> Result<(), ContextError> {
    let path = Path::new(value);
    let ok = !value.is_empty()
        && path.components().count() == 1
        && matches!(path.components().next(), Some(std::path::Component::Normal(_)));
    if ok {
        Ok(())
    } else {
        Err(ContextError::NotAComponent {
            field,
            value: value.to_string(),
        })
    }
}
