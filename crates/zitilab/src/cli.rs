//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Health endpoint of a local `ziti edge quickstart` controller
pub const DEFAULT_HEALTH_URL: &str = "https://127.0.0.1:1280/edge/client/v1/version";

#[derive(Parser)]
#[command(name = "zitilab")]
#[command(version, about = "Fetch OpenZiti release builds and run throwaway quickstarts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub repo: RepoArgs,
}

/// Overrides applied on top of the environment configuration
#[derive(Args, Debug, Default)]
pub struct RepoArgs {
    /// GitHub owner of the release repository
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// GitHub repository name
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Root directory for staged executables
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and stage the executable, then print its path
    Fetch {
        /// Release tag (e.g. "v1.1.3"); latest when omitted
        #[arg(long)]
        version: Option<String>,

        /// Append the staging directory to PATH
        #[arg(long)]
        add_to_path: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stage, launch `ziti edge quickstart`, wait for health, run COMMAND
    Quickstart {
        /// Release tag; latest when omitted
        #[arg(long)]
        version: Option<String>,

        /// URL polled until it answers 2xx
        #[arg(long, env = "ZITI_HEALTH_URL", default_value = DEFAULT_HEALTH_URL)]
        health_url: String,

        /// Seconds to wait for the health endpoint
        #[arg(long, default_value_t = 120)]
        timeout: u64,

        /// Seconds between SIGTERM and a forced kill
        #[arg(long, default_value_t = 10)]
        grace: u64,

        /// Extra argument for `ziti edge quickstart` (repeatable)
        #[arg(long = "ziti-arg", allow_hyphen_values = true)]
        ziti_args: Vec<String>,

        /// Command to run once the quickstart is healthy (after --)
        #[arg(last = true)]
        command: Vec<String>,
    },
}
