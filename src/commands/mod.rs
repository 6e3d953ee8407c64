//! Command handlers for the `shipyard` binary

mod activate;
mod deploy;
mod history;
mod prep;
mod project_root;
mod prune;
mod releases;
mod workspace;

pub use activate::cmd_activate;
pub use deploy::cmd_deploy;
pub use history::cmd_history;
pub use prep::cmd_prep;
pub use prune::cmd_prune;
pub use releases::cmd_releases;
