//! Shipyard - content-addressed release deployment
//!
//! Ships a prepared build to remote hosts as immutable, hash-named release
//! directories, links static assets under a content hash, and cuts over by
//! atomically repointing one `active` symlink. Old releases are pruned by a
//! retention policy that never touches the active one.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeployUseCase, HostSpec};
pub use config::{ConfigWarning, ShipyardConfig};
pub use domain::context::DeploymentContext;
pub use domain::phase::DeployPhase;
pub use domain::value_objects::{ReleaseLayout, RetentionPolicy, RevisionHash, StaticHash};
pub use error::{DeployError, DeployResult, ErrorKind};
