//! Prep command handler

use std::path::Path;

use anyhow::Result;

use shipyard::application::PrepBuild;
use shipyard::infrastructure::LocalExecutor;

use super::workspace::Workspace;

pub fn cmd_prep(
    config: Option<&Path>,
    branch: Option<String>,
    build_cmd: Option<String>,
    json: bool,
) -> Result<()> {
    let ws = Workspace::load(config)?;
    let context = ws.context()?;
    let repo = ws.repository()?;
    let reference = ws.reference(branch);
    let exec = LocalExecutor::default();

    let report = PrepBuild::new(&repo, &exec, &context).run(
        &ws.project_root,
        &reference,
        build_cmd.as_deref(),
    )?;

    if json {
        let value = serde_json::json!({
            "command": "prep",
            "reference": reference,
            "revision": report.version.revision.to_string(),
            "static_hash": report.version.static_hash.to_string(),
            "build_dir": report.build_dir,
            "built": report.built,
        });
        println!("{}", serde_json::to_string(&value)?);
    } else {
        println!(
            "✓ {} prepared for {reference}: revision {}, static {}",
            report.build_dir.display(),
            report.version.revision,
            report.version.static_hash
        );
    }
    Ok(())
}
