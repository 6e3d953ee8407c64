//! Per-platform host adapters
//!
//! SmartOS zones use pkgsrc and SMF; Debian hosts use apt and systemd.
//! Package installs probe first so re-running a deploy does not reinstall.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::ports::{shell_quote, ExecError, HostAdapter, RemoteCommand, RemoteExecutor};

/// Platforms a host can declare in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Smartos,
    Debian,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Smartos => "smartos",
            Platform::Debian => "debian",
        }
    }

    pub fn adapter(self) -> Arc<dyn HostAdapter> {
        match self {
            Platform::Smartos => Arc::new(SmartOsHost),
            Platform::Debian => Arc::new(DebianHost),
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smartos" | "joyent" => Ok(Platform::Smartos),
            "debian" | "ubuntu" => Ok(Platform::Debian),
            other => Err(format!("unknown platform '{other}' (expected smartos or debian)")),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn installed(exec: &dyn RemoteExecutor, probe: String) -> Result<bool, ExecError> {
    Ok(exec.run(&RemoteCommand::new(probe).warn_only())?.success())
}

/// SmartOS (Joyent) zone: `pkg_add`, `svcadm`
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartOsHost;

impl HostAdapter for SmartOsHost {
    fn platform(&self) -> &'static str {
        Platform::Smartos.as_str()
    }

    fn install_package(&self, exec: &dyn RemoteExecutor, package: &str) -> Result<(), ExecError> {
        let pkg = shell_quote(package);
        if installed(exec, format!("pkg_info -e {pkg}"))? {
            tracing::debug!(host = exec.host(), package, "already installed");
            return Ok(());
        }
        exec.run(&RemoteCommand::new(format!("pkg_add {pkg}")).privileged())?;
        Ok(())
    }

    fn restart_service(&self, exec: &dyn RemoteExecutor, service: &str) -> Result<(), ExecError> {
        exec.run(
            &RemoteCommand::new(format!("svcadm restart {}", shell_quote(service))).privileged(),
        )?;
        Ok(())
    }

    fn data_directory_for(&self, service: &str) -> PathBuf {
        match service {
            "postgresql" | "postgres" => PathBuf::from("/var/pgsql/data"),
            "nginx" => PathBuf::from("/opt/local/www"),
            other => PathBuf::from("/var/db").join(other),
        }
    }
}

/// Debian/Ubuntu host: `apt-get`, `systemctl`
#[derive(Debug, Clone, Copy, Default)]
pub struct DebianHost;

impl HostAdapter for DebianHost {
    fn platform(&self) -> &'static str {
        Platform::Debian.as_str()
    }

    fn install_package(&self, exec: &dyn RemoteExecutor, package: &str) -> Result<(), ExecError> {
        let pkg = shell_quote(package);
        if installed(exec, format!("dpkg -s {pkg} >/dev/null 2>&1"))? {
            tracing::debug!(host = exec.host(), package, "already installed");
            return Ok(());
        }
        exec.run(
            &RemoteCommand::new(format!(
                "DEBIAN_FRONTEND=noninteractive apt-get install -y {pkg}"
            ))
            .privileged(),
        )?;
        Ok(())
    }

    fn restart_service(&self, exec: &dyn RemoteExecutor, service: &str) -> Result<(), ExecError> {
        exec.run(
            &RemoteCommand::new(format!("systemctl restart {}", shell_quote(service)))
                .privileged(),
        )?;
        Ok(())
    }

    fn data_directory_for(&self, service: &str) -> PathBuf {
        match service {
            "postgresql" | "postgres" => PathBuf::from("/var/lib/postgresql/data"),
            "nginx" => PathBuf::from("/var/www"),
            other => PathBuf::from("/var/lib").join(other),
        }
    }
}
