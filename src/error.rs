//! Error types for Shipyard
//!
//! Uses `thiserror` for library errors. Every deploy failure carries the host
//! it happened on, so multi-host runs can report per-host outcomes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Kind of a deploy failure, independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Resolution,
    Transfer,
    Merge,
    ConfigRender,
    Prune,
    Activation,
    Lock,
    Build,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Resolution => "resolution",
            ErrorKind::Transfer => "transfer",
            ErrorKind::Merge => "merge",
            ErrorKind::ConfigRender => "config_render",
            ErrorKind::Prune => "prune",
            ErrorKind::Activation => "activation",
            ErrorKind::Lock => "lock",
            ErrorKind::Build => "build",
            ErrorKind::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Bad ref, tracked path without history, or a stale build stamp
    #[error("cannot resolve '{reference}': {message}")]
    Resolution { reference: String, message: String },

    /// Staging transfer failed; nothing on the host was touched
    #[error("[{host}] transfer to {staging} failed: {message}")]
    Transfer {
        host: String,
        staging: PathBuf,
        message: String,
    },

    /// Materializing the release directory (or its static link) failed
    #[error("[{host}] merge into {release} failed: {message}")]
    Merge {
        host: String,
        release: PathBuf,
        message: String,
    },

    /// Rendering or writing host settings failed; the release stays unreferenced
    #[error("[{host}] rendering '{template}' failed: {message}")]
    ConfigRender {
        host: String,
        template: String,
        message: String,
    },

    /// Retention pruning or the orphan sweep failed (non-fatal)
    #[error("[{host}] pruning {path} failed: {message}")]
    Prune {
        host: String,
        path: PathBuf,
        message: String,
    },

    /// Repointing the active link failed
    #[error("[{host}] activating {release} failed: {message}")]
    Activation {
        host: String,
        release: PathBuf,
        message: String,
    },

    /// Another deploy holds the host lease
    #[error("[{host}] deploy lease {path} is held: {message}")]
    Lock {
        host: String,
        path: PathBuf,
        message: String,
    },

    /// The local build command failed or its output could not be stamped
    #[error("build failed: {message}")]
    Build { message: String },

    /// Invalid configuration
    #[error("invalid configuration in {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error outside any deploy phase
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::Resolution { .. } => ErrorKind::Resolution,
            DeployError::Transfer { .. } => ErrorKind::Transfer,
            DeployError::Merge { .. } => ErrorKind::Merge,
            DeployError::ConfigRender { .. } => ErrorKind::ConfigRender,
            DeployError::Prune { .. } => ErrorKind::Prune,
            DeployError::Activation { .. } => ErrorKind::Activation,
            DeployError::Lock { .. } => ErrorKind::Lock,
            DeployError::Build { .. } => ErrorKind::Build,
            DeployError::Config { .. } | DeployError::Io(_) => ErrorKind::Config,
        }
    }

    /// Whether this error stops a deploy. Only pruning is allowed to fail softly.
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::Prune
    }

    /// Host the error was observed on, if it is host-scoped
    pub fn host(&self) -> Option<&str> {
        match self {
            DeployError::Transfer { host, .. }
            | DeployError::Merge { host, .. }
            | DeployError::ConfigRender { host, .. }
            | DeployError::Prune { host, .. }
            | DeployError::Activation { host, .. }
            | DeployError::Lock { host, .. } => Some(host),
            DeployError::Resolution { .. }
            | DeployError::Build { .. }
            | DeployError::Config { .. }
            | DeployError::Io(_) => {
                None
            }
        }
    }
}
