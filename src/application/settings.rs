//! Host configuration rendering
//!
//! Renders the settings template for a host's role and appends it to the
//! settings file inside the merged release. The role template is used when
//! one exists under the role's name, the base template otherwise.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::domain::context::DeploymentContext;
use crate::domain::ports::{HostAdapter, HostFs, TemplateRenderer};
use crate::error::{DeployError, DeployResult};

use super::resolver::ResolvedVersion;

/// Role used for data-directory lookup when a host declares none
pub const DEFAULT_ROLE: &str = "app";

pub struct HostConfigurator<'a> {
    fs: &'a dyn HostFs,
    renderer: &'a dyn TemplateRenderer,
    adapter: &'a dyn HostAdapter,
    context: &'a DeploymentContext,
}

impl<'a> HostConfigurator<'a> {
    pub fn new(
        fs: &'a dyn HostFs,
        renderer: &'a dyn TemplateRenderer,
        adapter: &'a dyn HostAdapter,
        context: &'a DeploymentContext,
    ) -> Self {
        Self {
            fs,
            renderer,
            adapter,
            context,
        }
    }

    pub fn template_for(&self, role: Option<&str>) -> String {
        match role {
            Some(role) if self.renderer.exists(role) => role.to_string(),
            _ => self.context.settings_template().to_string(),
        }
    }

    /// Template context: the host's own table overlaid with deploy facts
    pub fn template_context(
        &self,
        release_path: &Path,
        version: &ResolvedVersion,
        role: Option<&str>,
        host_context: &Map<String, Value>,
    ) -> Value {
        let layout = self.context.layout();
        let mut ctx = host_context.clone();
        let facts = json!({
            "host": self.fs.host(),
            "role": role.unwrap_or(DEFAULT_ROLE),
            "platform": self.adapter.platform(),
            "revision": version.revision.as_str(),
            "static_hash": version.static_hash.as_str(),
            "release_path": release_path.display().to_string(),
            "static_location": layout.shared_static_dir().display().to_string(),
            "static_link": version.static_hash.link_name(layout.cache_prefix()),
            "data_dir": self
                .adapter
                .data_directory_for(role.unwrap_or(DEFAULT_ROLE))
                .display()
                .to_string(),
        });
        if let Value::Object(facts) = facts {
            ctx.extend(facts);
        }
        Value::Object(ctx)
    }

    /// Render and append; returns the settings file written
    pub fn configure(
        &self,
        release_path: &Path,
        version: &ResolvedVersion,
        role: Option<&str>,
        host_context: &Map<String, Value>,
    ) -> DeployResult<PathBuf> {
        let template = self.template_for(role);
        let fail = |message: String| DeployError::ConfigRender {
            host: self.fs.host().to_string(),
            template: template.clone(),
            message,
        };

        let ctx = self.template_context(release_path, version, role, host_context);
        let rendered = self
            .renderer
            .render(&template, &ctx)
            .map_err(|e| fail(e.to_string()))?;

        let settings = release_path.join(self.context.settings_file());
        self.fs
            .append(&settings, &rendered)
            .map_err(|e| fail(format!("writing {}: {e}", settings.display())))?;

        tracing::info!(
            host = self.fs.host(),
            template = %template,
            settings = %settings.display(),
            "host settings written"
        );
        Ok(settings)
    }
}
