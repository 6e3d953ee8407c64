//! Release queries
//!
//! Read-only view of the releases on a host, oldest first, with the active
//! one marked.

use std::time::SystemTime;

use serde::Serialize;

use crate::domain::ports::{FsResult, HostFs};
use crate::domain::value_objects::ReleaseLayout;

use super::activate::current_release;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseInfo {
    pub name: String,
    #[serde(with = "unix_secs")]
    pub modified: SystemTime,
    pub active: bool,
}

mod unix_secs {
    use serde::Serializer;
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S: Serializer>(t: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
        let secs = t
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        s.serialize_u64(secs)
    }
}

pub fn list_releases(fs: &dyn HostFs, layout: &ReleaseLayout) -> FsResult<Vec<ReleaseInfo>> {
    let active = current_release(fs, layout)?;
    let mut releases: Vec<ReleaseInfo> = fs
        .list_dirs(&layout.release_root())?
        .into_iter()
        .map(|d| ReleaseInfo {
            active: active.as_deref() == Some(d.name.as_str()),
            name: d.name,
            modified: d.modified,
        })
        .collect();
    releases.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)));
    Ok(releases)
}
