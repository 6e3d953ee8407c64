//! Host sessions
//!
//! Bundles the collaborators one deploy needs for one host. The address
//! `local` binds everything to this machine (`sh`, `std::fs`, in-process
//! sync); anything else is an ssh destination driven through `ssh` and
//! `rsync`.

use std::sync::Arc;

use crate::domain::ports::{FileTransfer, HostAdapter, HostFs, RemoteExecutor};

use super::exec::{LocalExecutor, SshExecutor};
use super::fs::{LocalHostFs, RemoteHostFs};
use super::hosts::Platform;
use super::sync::{LocalTransfer, RsyncTransfer};

pub const LOCAL_ADDRESS: &str = "local";

#[derive(Clone)]
pub struct HostSession {
    pub name: String,
    pub exec: Arc<dyn RemoteExecutor>,
    pub fs: Arc<dyn HostFs>,
    pub transfer: Arc<dyn FileTransfer>,
    pub adapter: Arc<dyn HostAdapter>,
}

impl HostSession {
    pub fn connect(name: &str, address: &str, platform: Platform, sudo: bool) -> Self {
        if address == LOCAL_ADDRESS {
            return Self {
                name: name.to_string(),
                exec: Arc::new(LocalExecutor::new(name)),
                fs: Arc::new(LocalHostFs::new(name)),
                transfer: Arc::new(LocalTransfer::new()),
                adapter: platform.adapter(),
            };
        }

        let exec: Arc<dyn RemoteExecutor> = Arc::new(SshExecutor::new(name, address));
        tracing::debug!(host = name, address, %platform, sudo, "opening ssh session");
        Self {
            name: name.to_string(),
            fs: Arc::new(RemoteHostFs::new(exec.clone()).privileged(sudo)),
            exec,
            transfer: Arc::new(RsyncTransfer::new(address)),
            adapter: platform.adapter(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.transfer.name() == "local"
    }
}

impl std::fmt::Debug for HostSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSession")
            .field("name", &self.name)
            .field("transfer", &self.transfer.name())
            .field("platform", &self.adapter.platform())
            .finish()
    }
}
