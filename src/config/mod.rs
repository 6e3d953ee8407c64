//! Configuration module for Shipyard
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SHIPYARD_*)
//! 3. Project config (shipyard.toml)
//! 4. Built-in defaults (lowest priority)
//!
//! The result is turned into a `DeploymentContext` once per invocation.

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{load_with_warnings, with_env_overrides, with_overrides_from, CONFIG_FILE};
pub use types::{DeployConfig, HostConfig, ShipyardConfig};
