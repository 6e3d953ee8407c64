//! Common test utilities for Shipyard integration and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: a git project plus a separate deployment root, and helpers
//!   to run the `shipyard` binary against a `local` host
//! - Assertion macros: `assert_active!`, `assert_output_contains!`
//! - Fixtures: reusable file contents

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fixtures;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
