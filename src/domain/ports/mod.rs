//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod deploy_events;
pub mod executor;
pub mod file_system;
pub mod file_transfer;
pub mod history_repository;
pub mod host_adapter;
pub mod template_renderer;
pub mod version_control;

pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use executor::{
    quote_path, shell_quote, CommandOutput, ExecError, RemoteCommand, RemoteExecutor,
};
pub use file_system::{DirInfo, FsError, FsResult, HostFs};
pub use file_transfer::{DeleteMode, FileTransfer, SyncSpec, TransferError, TransferStats};
pub use history_repository::{DeployRecord, HistoryError, HistoryRepository};
pub use host_adapter::HostAdapter;
pub use template_renderer::{RenderError, TemplateRenderer};
pub use version_control::{VcsError, VersionControl};
