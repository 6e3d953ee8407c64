//! Repository Implementations
//!
//! Concrete implementations of domain repository ports.

mod history;

pub use history::TomlHistoryRepository;
