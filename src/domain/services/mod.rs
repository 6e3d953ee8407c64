//! Domain Services
//!
//! Stateless business logic with no I/O.

mod retention_planner;

pub use retention_planner::{plan_prune, PrunePlan, ReleaseEntry};
