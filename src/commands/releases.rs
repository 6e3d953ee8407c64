//! Releases command handler

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};

use shipyard::application::list_releases;

use super::workspace::Workspace;

pub fn cmd_releases(config: Option<&Path>, host: &str, json: bool) -> Result<()> {
    let ws = Workspace::load(config)?;
    let context = ws.context()?;
    let session = ws.session(host)?;

    let releases = list_releases(session.fs.as_ref(), context.layout())?;

    if json {
        let value = serde_json::json!({
            "command": "releases",
            "host": host,
            "releases": releases,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    if releases.is_empty() {
        println!("{host}: no releases under {}", context.layout().release_root().display());
        return Ok(());
    }
    for release in &releases {
        let modified: DateTime<Utc> = release.modified.into();
        println!(
            "{} {}  {}",
            if release.active { "*" } else { " " },
            release.name,
            modified.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}
