//! Shipyard CLI - content-addressed release deployment
//!
//! Usage: shipyard <COMMAND>
//!
//! Commands:
//!   deploy    Deploy a branch or tag to one or more hosts
//!   prep      Build the project and stamp the build with its versions
//!   releases  List releases on a host
//!   prune     Apply retention on a host
//!   activate  Repoint a host's active release (rollback)
//!   history   Show recorded deploys

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use cli::{Cli, Commands};

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "shipyard=info,warn",
        2 => "shipyard=debug,info",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Deploy {
            hosts,
            branch,
            dry_run,
        } => commands::cmd_deploy(config, hosts, branch, dry_run, cli.json),
        Commands::Prep { branch, build_cmd } => {
            commands::cmd_prep(config, branch, build_cmd, cli.json)
        }
        Commands::Releases { host } => commands::cmd_releases(config, &host, cli.json),
        Commands::Prune { host } => commands::cmd_prune(config, &host, cli.json),
        Commands::Activate { host, revision } => {
            commands::cmd_activate(config, &host, &revision, cli.json)
        }
        Commands::History { limit } => commands::cmd_history(config, limit, cli.json),
    }
}
