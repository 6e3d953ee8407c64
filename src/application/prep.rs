//! Build preparation
//!
//! Runs the project's build command and stamps the build directory with the
//! hashes it was built for. A later deploy refuses a build whose stamps do
//! not match what its reference resolves to.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::context::DeploymentContext;
use crate::domain::ports::{quote_path, RemoteCommand, RemoteExecutor, VersionControl};
use crate::error::{DeployError, DeployResult};

use super::resolver::{ContentVersionResolver, ResolvedVersion, CODE_VERSION_STAMP, VERSION_STAMP};

#[derive(Debug, Clone)]
pub struct PrepReport {
    pub version: ResolvedVersion,
    pub build_dir: PathBuf,
    pub built: bool,
}

pub struct PrepBuild<'a> {
    vcs: &'a dyn VersionControl,
    exec: &'a dyn RemoteExecutor,
    context: &'a DeploymentContext,
}

impl<'a> PrepBuild<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        exec: &'a dyn RemoteExecutor,
        context: &'a DeploymentContext,
    ) -> Self {
        Self { vcs, exec, context }
    }

    pub fn run(
        &self,
        project_root: &Path,
        reference: &str,
        build_command: Option<&str>,
    ) -> DeployResult<PrepReport> {
        let resolver = ContentVersionResolver::new(self.vcs);
        let version = resolver.resolve(reference, self.context.track_static())?;

        // The build runs on the working tree, which must be the commit being stamped
        let head = resolver.resolve("HEAD", self.context.track_static())?;
        if head.revision != version.revision {
            return Err(DeployError::Resolution {
                reference: reference.to_string(),
                message: format!(
                    "working tree is at {} but the reference is {}; check it out first",
                    head.revision, version.revision
                ),
            });
        }

        let build_dir = project_root.join(self.context.build_dir());
        let built = match build_command {
            Some(cmd) => {
                tracing::info!(command = cmd, "running build");
                let line = format!("cd {} && {}", quote_path(project_root), cmd);
                self.exec
                    .run(&RemoteCommand::new(line))
                    .map_err(|e| DeployError::Build {
                        message: e.to_string(),
                    })?;
                true
            }
            None => false,
        };

        let stamp = |name: &str, value: &str| {
            fs::write(build_dir.join(name), format!("{value}\n")).map_err(|e| {
                DeployError::Build {
                    message: format!("writing {}: {e}", build_dir.join(name).display()),
                }
            })
        };
        fs::create_dir_all(&build_dir).map_err(|e| DeployError::Build {
            message: format!("creating {}: {e}", build_dir.display()),
        })?;
        stamp(CODE_VERSION_STAMP, version.revision.as_str())?;
        stamp(VERSION_STAMP, version.static_hash.as_str())?;

        tracing::info!(
            revision = %version.revision,
            static_hash = %version.static_hash,
            build_dir = %build_dir.display(),
            "build prepared"
        );
        Ok(PrepReport {
            version,
            build_dir,
            built,
        })
    }
}
