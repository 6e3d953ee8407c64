//! TemplateRenderer port - host-role specific configuration text
//!
//! The engine only needs "does this template exist" and "render it to a
//! string"; writing the result into a release is done through `HostFs`.

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template '{0}' not found")]
    NotFound(String),

    #[error("template '{template}' references unknown key '{key}'")]
    MissingKey { template: String, key: String },

    #[error("template '{template}' is malformed: {message}")]
    Malformed { template: String, message: String },

    #[error("failed to read template '{template}': {source}")]
    Io {
        template: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait TemplateRenderer: Send + Sync {
    fn exists(&self, name: &str) -> bool;

    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, RenderError>;
}
