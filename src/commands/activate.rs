//! Activate command handler (manual rollback)

use std::path::Path;

use anyhow::Result;

use shipyard::application::ActivationSwitch;
use shipyard::domain::value_objects::RevisionHash;
use shipyard::infrastructure::lease::{owner_label, DeployLease};

use super::workspace::Workspace;

pub fn cmd_activate(config: Option<&Path>, host: &str, revision: &str, json: bool) -> Result<()> {
    let ws = Workspace::load(config)?;
    let context = ws.context()?;
    let session = ws.session(host)?;
    let fs = session.fs.as_ref();
    let layout = context.layout();
    let revision = RevisionHash::parse(revision)?;

    let lease = DeployLease::acquire(fs, &layout.lock_path(), &owner_label(), context.lock_ttl())?;
    let activation = ActivationSwitch::new(fs, layout).activate(&layout.release_path(&revision))?;
    lease.release()?;

    if json {
        let value = serde_json::json!({
            "command": "activate",
            "host": host,
            "release": activation.release,
            "previous": activation.previous,
            "changed": activation.changed,
        });
        println!("{}", serde_json::to_string(&value)?);
    } else if activation.changed {
        println!(
            "{host}: active {} -> {revision}",
            activation.previous.as_deref().unwrap_or("(none)")
        );
    } else {
        println!("{host}: {revision} is already active");
    }
    Ok(())
}
