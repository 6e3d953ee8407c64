//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod hash;
mod layout;
mod retention;

pub use config_warning::ConfigWarning;
pub use hash::{ContentHash, HashError, RevisionHash, StaticHash};
pub use layout::{ReleaseLayout, ACTIVE_LINK, CODE_DIR, LOCK_DIR};
pub use retention::{InvalidRetention, RetentionPolicy};
