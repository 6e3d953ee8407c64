//! TOML History Repository
//!
//! Persists the deploy ledger (default `.shipyard/history.toml` in the project).
//! Appends take an exclusive `fs2` lock on a sibling `.lock` file so per-host
//! deploy threads, and concurrent invocations, never lose each other's records.

use std::fs;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{DeployRecord, HistoryError, HistoryRepository};

const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TomlHistory {
    version: u32,
    #[serde(default)]
    deploys: Vec<DeployRecord>,
}

impl Default for TomlHistory {
    fn default() -> Self {
        Self {
            version: LEDGER_VERSION,
            deploys: Vec::new(),
        }
    }
}

pub struct TomlHistoryRepository {
    path: PathBuf,
}

impl TomlHistoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn load_from_disk(&self) -> Result<TomlHistory, HistoryError> {
        if !self.path.exists() {
            return Ok(TomlHistory::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| HistoryError::AccessError {
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| HistoryError::Corrupted {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn save_to_disk(&self, history: &TomlHistory) -> Result<(), HistoryError> {
        let content =
            toml::to_string_pretty(history).map_err(|e| HistoryError::SerializationError {
                message: e.to_string(),
            })?;

        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| HistoryError::AccessError {
                message: e.to_string(),
            })?;
        std::io::Write::write_all(&mut tmp, content.as_bytes()).map_err(|e| {
            HistoryError::AccessError {
                message: e.to_string(),
            }
        })?;
        tmp.persist(&self.path)
            .map_err(|e| HistoryError::AccessError {
                message: e.error.to_string(),
            })?;
        Ok(())
    }
}

impl HistoryRepository for TomlHistoryRepository {
    fn load(&self) -> Result<Vec<DeployRecord>, HistoryError> {
        Ok(self.load_from_disk()?.deploys)
    }

    fn append(&self, record: DeployRecord) -> Result<(), HistoryError> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(|e| HistoryError::AccessError {
                message: e.to_string(),
            })?;
        }

        let lock_file = fs::File::create(&lock_path).map_err(|e| HistoryError::AccessError {
            message: e.to_string(),
        })?;
        lock_file
            .lock_exclusive()
            .map_err(|e| HistoryError::AccessError {
                message: e.to_string(),
            })?;

        let result = self.load_from_disk().and_then(|mut history| {
            history.deploys.push(record);
            self.save_to_disk(&history)
        });

        let _ = lock_file.unlock();
        result
    }
}
