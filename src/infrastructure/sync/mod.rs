//! File Transfer Implementations
//!
//! Concrete implementations of the FileTransfer port:
//! - RsyncTransfer: rsync over ssh to a remote host
//! - LocalTransfer: in-process sync to a directory on this machine

mod local;
mod rsync;
pub(crate) mod tree;

pub use local::LocalTransfer;
pub use rsync::RsyncTransfer;
pub(crate) use rsync::{parse_itemized, spec_flags};
pub use tree::sync_tree;
