//! File-backed template renderer
//!
//! Templates live as plain files under one directory and use `{{ key }}`
//! placeholders. Keys are dotted paths into the JSON context
//! (`{{ nginx.static_location }}`). A missing key is an error rather than an
//! empty string, so a half-configured host never receives settings with holes.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::ports::{RenderError, TemplateRenderer};

#[derive(Debug, Clone)]
pub struct FileTemplateRenderer {
    root: PathBuf,
}

impl FileTemplateRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateRenderer for FileTemplateRenderer {
    fn exists(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    fn render(&self, name: &str, context: &Value) -> Result<String, RenderError> {
        let path = self.root.join(name);
        let source = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::NotFound(name.to_string())
            } else {
                RenderError::Io {
                    template: name.to_string(),
                    source: e,
                }
            }
        })?;
        render_str(name, &source, context)
    }
}

/// Substitute every `{{ key }}` in `source`
pub fn render_str(name: &str, source: &str, context: &Value) -> Result<String, RenderError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| RenderError::Malformed {
            template: name.to_string(),
            message: format!("unclosed '{{{{' at byte {}", source.len() - rest.len() + start),
        })?;

        let key = after[..end].trim();
        if key.is_empty() {
            return Err(RenderError::Malformed {
                template: name.to_string(),
                message: "empty placeholder".to_string(),
            });
        }
        let value = lookup(context, key).ok_or_else(|| RenderError::MissingKey {
            template: name.to_string(),
            key: key.to_string(),
        })?;
        out.push_str(&display(value));
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn lookup<'a>(context: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(context, |value, part| match value {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
