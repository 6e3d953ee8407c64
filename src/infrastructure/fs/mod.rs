//! Host filesystem implementations

mod local;
mod remote;

pub use local::LocalHostFs;
pub use remote::RemoteHostFs;
