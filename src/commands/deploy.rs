//! Deploy command handler
//!
//! One orchestrator run per host on scoped threads. Hosts share nothing but
//! the event sink and the locked history ledger.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use shipyard::application::{DeployOptions, DeployReport, DeployUseCase, HostSpec};
use shipyard::domain::ports::DeployEventSink;
use shipyard::infrastructure::{
    ConsoleEventSink, FileTemplateRenderer, HostSession, JsonEventSink,
};

use super::workspace::Workspace;

pub fn cmd_deploy(
    config: Option<&Path>,
    hosts: Vec<String>,
    branch: Option<String>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let ws = Workspace::load(config)?;
    let context = ws.context()?;
    let repo = ws.repository()?;
    let renderer = FileTemplateRenderer::new(context.templates_dir());
    let history = ws.history();
    let reference = ws.reference(branch);

    let names = ws.host_names(hosts);
    if names.is_empty() {
        bail!("no hosts configured; add a [hosts.<name>] table to shipyard.toml");
    }
    // Every host must be known before any of them is touched
    let targets = names
        .iter()
        .map(|name| Ok((ws.host_spec(name)?, ws.session(name)?)))
        .collect::<Result<Vec<(HostSpec, HostSession)>>>()?;

    let events: Arc<dyn DeployEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(ConsoleEventSink::stderr())
    };
    let use_case = DeployUseCase::new(&context, &repo, &renderer)
        .with_history(&history)
        .with_events(events);
    let options = DeployOptions::new(&reference).with_dry_run(dry_run);

    tracing::info!(reference = %reference, hosts = targets.len(), dry_run, "deploying");

    let use_case = &use_case;
    let options = &options;
    let reports: Vec<DeployReport> = std::thread::scope(|s| {
        let handles: Vec<_> = targets
            .iter()
            .map(|(spec, session)| s.spawn(move || use_case.execute(spec, session, options)))
            .collect();
        handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .collect()
    });

    if dry_run {
        for report in &reports {
            print_plan(report, json)?;
        }
    } else if !json {
        for report in &reports {
            print_summary(report);
        }
    }

    let failed = targets.len() - reports.iter().filter(|r| r.is_success()).count();
    if failed > 0 {
        bail!("deploy failed on {failed} of {} host(s)", targets.len());
    }
    Ok(())
}

fn print_summary(report: &DeployReport) {
    match (&report.error, &report.revision_hash) {
        (Some(err), _) => {
            let phase = report
                .failed_in
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            eprintln!("✗ {}: failed in {phase}: {err}", report.host);
        }
        (None, Some(revision)) => {
            eprintln!("✓ {}: {} is active", report.host, revision);
        }
        (None, None) => eprintln!("✓ {}", report.host),
    }
    for warning in &report.warnings {
        eprintln!("  ⚠ {warning}");
    }
}

fn print_plan(report: &DeployReport, json: bool) -> Result<()> {
    if let Some(err) = &report.error {
        if !json {
            eprintln!("✗ {}: {err}", report.host);
        }
        return Ok(());
    }
    let Some(plan) = &report.plan else {
        return Ok(());
    };

    if json {
        let value = serde_json::json!({
            "command": "deploy",
            "event": "plan",
            "host": report.host,
            "revision": report.revision_hash.as_ref().map(|r| r.to_string()),
            "static_hash": report.static_hash.as_ref().map(|s| s.to_string()),
            "staging_path": plan.staging_path,
            "release_path": plan.release_path,
            "static_link": plan.static_link,
            "active": plan.active,
            "prune": plan.prune.remove,
            "keep": plan.prune.keep,
        });
        println!("{}", serde_json::to_string(&value)?);
        return Ok(());
    }

    println!("{} (dry run)", report.host);
    println!("  stage into   {}", plan.staging_path.display());
    println!("  release      {}", plan.release_path.display());
    println!("  static link  {}", plan.static_link.display());
    println!(
        "  active       {}",
        plan.active.as_deref().unwrap_or("(none)")
    );
    if plan.prune.remove.is_empty() {
        println!("  prune        nothing");
    } else {
        println!("  prune        {}", plan.prune.remove.join(", "));
    }
    if plan.prune.over_budget > 0 {
        println!(
            "  ⚠ {} release(s) over budget remain protected",
            plan.prune.over_budget
        );
    }
    Ok(())
}
