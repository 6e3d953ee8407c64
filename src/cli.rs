use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Shipyard - content-addressed release deployment
#[derive(Parser, Debug)]
#[command(name = "shipyard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Hosts and paths are read from shipyard.toml in the project root.")]
pub struct Cli {
    /// Emit NDJSON events instead of progress lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: shipyard.toml in the project root)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a branch or tag to one or more hosts
    Deploy {
        /// Host to deploy to (repeatable; default: every configured host)
        #[arg(long = "host", value_name = "NAME")]
        hosts: Vec<String>,

        /// Branch, tag or commit (default: deploy.default_branch)
        #[arg(short, long)]
        branch: Option<String>,

        /// Resolve and report the plan without touching any host
        #[arg(long)]
        dry_run: bool,
    },

    /// Build the project and stamp the build with its versions
    Prep {
        /// Branch, tag or commit the working tree is at
        #[arg(short, long)]
        branch: Option<String>,

        /// Shell command producing the build directory
        #[arg(long, value_name = "CMD")]
        build_cmd: Option<String>,
    },

    /// List releases on a host, oldest first
    Releases {
        /// Configured host name
        host: String,
    },

    /// Apply retention and remove orphan static links on a host
    Prune {
        /// Configured host name
        host: String,
    },

    /// Point a host's active release at an existing release (rollback)
    Activate {
        /// Configured host name
        host: String,

        /// Release directory name (the revision hash)
        revision: String,
    },

    /// Show recorded deploys
    History {
        /// Only show the most recent N records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}
