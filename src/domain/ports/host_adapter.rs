//! HostAdapter port - per-platform capabilities
//!
//! Package names, service commands and data locations differ per operating
//! system. The orchestrator is handed one adapter per host instead of
//! branching on the platform itself.

use std::path::PathBuf;

use super::executor::{ExecError, RemoteExecutor};

pub trait HostAdapter: Send + Sync {
    /// Platform name as used in configuration (`smartos`, `debian`)
    fn platform(&self) -> &'static str;

    fn install_package(&self, exec: &dyn RemoteExecutor, package: &str) -> Result<(), ExecError>;

    fn restart_service(&self, exec: &dyn RemoteExecutor, service: &str) -> Result<(), ExecError>;

    /// Where a service keeps its data on this platform
    fn data_directory_for(&self, service: &str) -> PathBuf;
}
