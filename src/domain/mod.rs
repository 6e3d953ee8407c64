//! Domain Layer
//!
//! The release model without I/O: hashes, layout, retention, the deploy
//! phase machine, and the ports every host interaction goes through.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (hashes, layout, retention)
//! - `context` - The per-invocation `DeploymentContext`
//! - `phase` - Deploy state machine
//! - `services/` - Pure planning logic (retention)
//! - `ports/` - Interface definitions for infrastructure

pub mod context;
pub mod phase;
pub mod ports;
pub mod services;
pub mod value_objects;
