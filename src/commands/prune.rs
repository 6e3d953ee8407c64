//! Prune command handler

use std::path::Path;

use anyhow::Result;

use shipyard::application::RetentionPruner;
use shipyard::infrastructure::lease::{owner_label, DeployLease};

use super::workspace::Workspace;

pub fn cmd_prune(config: Option<&Path>, host: &str, json: bool) -> Result<()> {
    let ws = Workspace::load(config)?;
    let context = ws.context()?;
    let session = ws.session(host)?;
    let fs = session.fs.as_ref();
    let layout = context.layout();

    let lease = DeployLease::acquire(fs, &layout.lock_path(), &owner_label(), context.lock_ttl())?;
    let pruner = RetentionPruner::new(fs, layout, context.retention());
    let outcome = pruner.prune(&[])?;
    let swept = pruner.sweep_orphan_links()?;
    lease.release()?;

    if json {
        let value = serde_json::json!({
            "command": "prune",
            "host": host,
            "removed": outcome.removed,
            "kept": outcome.kept,
            "over_budget": outcome.over_budget,
            "swept": swept,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    if outcome.removed.is_empty() {
        println!("{host}: nothing to prune ({} kept)", outcome.kept.len());
    } else {
        println!("{host}: removed {}", outcome.removed.join(", "));
    }
    for link in &swept {
        println!("{host}: removed orphan link {}", link.display());
    }
    Ok(())
}
