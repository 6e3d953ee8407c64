//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::phase::DeployPhase;
use crate::error::ErrorKind;

/// Event emitted during deploy operations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeployEvent {
    /// Deploy started for a host
    Started { host: String, reference: String },

    /// A phase began
    PhaseStarted { host: String, phase: DeployPhase },

    /// Versions resolved
    Resolved {
        host: String,
        revision: String,
        static_hash: String,
    },

    /// Staging transfer finished
    Transferred {
        host: String,
        transferred: usize,
        deleted: usize,
    },

    /// Release directory materialized
    Merged { host: String, release: PathBuf },

    /// Content-addressed static link written
    StaticLinked { host: String, link: PathBuf },

    /// A release directory was deleted by retention
    ReleasePruned { host: String, release: String },

    /// A dangling static link was removed
    LinkSwept { host: String, link: PathBuf },

    /// Non-fatal problem (prune failure, service reload failure)
    Warning { host: String, message: String },

    /// Active pointer moved
    Activated {
        host: String,
        release: PathBuf,
        previous: Option<String>,
    },

    /// Deploy finished
    Completed {
        host: String,
        activated: bool,
        error: Option<ErrorKind>,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}
