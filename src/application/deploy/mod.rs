//! Deploy Module
//!
//! Orchestrates one release deployment per host.
//!
//! ## Structure
//!
//! - `options` - Invocation settings (`DeployOptions`) and host facts (`HostSpec`)
//! - `result` - Per-host outcome (`DeployReport`, `DryRunPlan`)
//! - `use_case` - The phase pipeline (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use shipyard::application::deploy::{DeployOptions, DeployUseCase, HostSpec};
//!
//! let use_case = DeployUseCase::new(&context, &repo, &renderer).with_events(sink);
//! let report = use_case.execute(&HostSpec::new("web1"), &session, &DeployOptions::new("master"));
//! ```

mod options;
mod result;
mod use_case;

pub use options::{DeployOptions, HostSpec};
pub use result::{DeployReport, DryRunPlan};
pub use use_case::DeployUseCase;
