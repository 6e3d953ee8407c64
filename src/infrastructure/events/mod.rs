//! Event Sink Implementations
//!
//! Provides concrete implementations of DeployEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - ConsoleEventSink: Human-readable progress on stderr

mod console;
mod json;

pub use console::{format_event, ConsoleEventSink};
pub use json::JsonEventSink;
