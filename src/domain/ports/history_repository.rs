//! HistoryRepository port
//!
//! Persists a ledger of finished deploys (local to the machine running them).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ErrorKind;

/// One finished deploy on one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRecord {
    pub host: String,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_hash: Option<String>,
    pub activated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    pub finished_at: DateTime<Utc>,
}

pub trait HistoryRepository: Send + Sync {
    fn load(&self) -> Result<Vec<DeployRecord>, HistoryError>;
    fn append(&self, record: DeployRecord) -> Result<(), HistoryError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Failed to access deploy history: {message}")]
    AccessError { message: String },

    #[error("Failed to serialize deploy history: {message}")]
    SerializationError { message: String },

    #[error(
        "deploy history corrupted: {path}\n  → Fix: move the file aside, the next deploy starts a new one\n  → Details: {message}"
    )]
    Corrupted { path: PathBuf, message: String },
}
