//! Application Layer
//!
//! Use cases that orchestrate the deploy flow.
//! This layer:
//! - Depends on Domain layer (value objects, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Resolve, stage, merge, configure, prune, activate
//! - `PrepBuild` - Run the build and stamp it with its versions
//! - `list_releases` - Read-only view of a host's releases
//!
//! ## Steps
//!
//! Each deploy phase is its own component so commands can run one alone
//! (`shipyard prune`, `shipyard activate`).

pub mod activate;
pub mod deploy;
pub mod merge;
pub mod prep;
pub mod prune;
pub mod releases;
pub mod resolver;
pub mod settings;
pub mod static_link;
pub mod transfer;

pub use activate::{current_release, Activation, ActivationSwitch};
pub use deploy::{DeployOptions, DeployReport, DeployUseCase, DryRunPlan, HostSpec};
pub use merge::ReleaseMerger;
pub use prep::{PrepBuild, PrepReport};
pub use prune::{PruneOutcome, RetentionPruner};
pub use releases::{list_releases, ReleaseInfo};
pub use resolver::{
    read_stamp, ContentVersionResolver, ResolvedVersion, CODE_VERSION_STAMP, VERSION_STAMP,
};
pub use settings::{HostConfigurator, DEFAULT_ROLE};
pub use static_link::StaticAssetLinker;
pub use transfer::ArtifactTransfer;
