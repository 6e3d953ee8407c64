//! History command handler

use std::path::Path;

use anyhow::Result;

use shipyard::domain::ports::HistoryRepository;

use super::workspace::Workspace;

pub fn cmd_history(config: Option<&Path>, limit: Option<usize>, json: bool) -> Result<()> {
    let ws = Workspace::load(config)?;
    let history = ws.history();
    let records = history.load()?;
    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    let records = &records[skip..];

    if json {
        let value = serde_json::json!({
            "command": "history",
            "deploys": records,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No deploys recorded in {}", history.path().display());
        return Ok(());
    }
    for record in records {
        let outcome = match (&record.error, record.activated) {
            (Some(kind), _) => format!("failed ({kind})"),
            (None, true) => "activated".to_string(),
            (None, false) => "ok".to_string(),
        };
        println!(
            "{}  {:<12} {:<16} {:<10} {}",
            record.finished_at.format("%Y-%m-%d %H:%M:%S"),
            record.host,
            record.reference,
            record.revision.as_deref().unwrap_or("-"),
            outcome
        );
    }
    Ok(())
}
