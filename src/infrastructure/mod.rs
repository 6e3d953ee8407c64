//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `exec/` - Command executors (ssh, local shell)
//! - `fs/` - Host file systems (local, shell-over-executor)
//! - `sync/` - Differential transfers (rsync, in-process)
//! - `vcs/` - Version control (git)
//! - `events/` - Deploy event sinks (console, NDJSON)
//! - `repositories/` - Deploy history ledger

pub mod events;
pub mod exec;
pub mod fs;
pub mod hosts;
pub mod lease;
pub mod repositories;
pub mod session;
pub mod sync;
pub mod templates;
pub mod vcs;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use exec::{LocalExecutor, SshExecutor};
pub use fs::{LocalHostFs, RemoteHostFs};
pub use hosts::{DebianHost, Platform, SmartOsHost};
pub use lease::{DeployLease, LeaseError};
pub use repositories::TomlHistoryRepository;
pub use session::HostSession;
pub use sync::{LocalTransfer, RsyncTransfer};
pub use templates::FileTemplateRenderer;
pub use vcs::GitRepository;
