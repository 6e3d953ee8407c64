//! Console Event Sink
//!
//! One human-readable line per notable event, prefixed with the host so
//! interleaved output from parallel hosts stays readable.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{DeployEvent, DeployEventSink};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

/// Render an event as a single line, or `None` for events not worth a line
pub fn format_event(event: &DeployEvent) -> Option<String> {
    let line = match event {
        DeployEvent::Started { host, reference } => format!("[{host}] deploying {reference}"),
        DeployEvent::PhaseStarted { .. } => return None,
        DeployEvent::Resolved {
            host,
            revision,
            static_hash,
        } => format!("[{host}] revision {revision}, static {static_hash}"),
        DeployEvent::Transferred {
            host,
            transferred,
            deleted,
        } => format!("[{host}] staged: {transferred} transferred, {deleted} deleted"),
        DeployEvent::Merged { host, release } => {
            format!("[{host}] merged {}", release.display())
        }
        DeployEvent::StaticLinked { host, link } => {
            format!("[{host}] linked {}", link.display())
        }
        DeployEvent::ReleasePruned { host, release } => format!("[{host}] pruned {release}"),
        DeployEvent::LinkSwept { host, link } => {
            format!("[{host}] removed dangling {}", link.display())
        }
        DeployEvent::Warning { host, message } => format!("[{host}] warning: {message}"),
        DeployEvent::Activated {
            host,
            release,
            previous,
        } => match previous {
            Some(prev) => format!("[{host}] active: {prev} -> {}", release.display()),
            None => format!("[{host}] active: {}", release.display()),
        },
        DeployEvent::Completed {
            host,
            activated,
            error,
        } => match (activated, error) {
            (_, Some(kind)) => format!("[{host}] FAILED ({kind})"),
            (true, None) => format!("[{host}] done"),
            (false, None) => format!("[{host}] done (not activated)"),
        },
    };
    Some(line)
}

impl DeployEventSink for ConsoleEventSink {
    fn on_event(&self, event: DeployEvent) {
        let Some(line) = format_event(&event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
        }
    }
}
