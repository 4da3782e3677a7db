//! Quickstart command - run `ziti edge quickstart` for the lifetime of a command

use crate::output::progress_callback;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use std::process::Command;
use std::time::Duration;
use zitilab_core::ReleaseConfig;
use zitilab_quickstart::{HealthOptions, QuickstartProcess, launch, poll_health, terminate};
use zitilab_release::{AcquireOptions, acquire};

pub struct QuickstartArgs {
    pub version: Option<String>,
    pub health_url: String,
    pub timeout: u64,
    pub grace: u64,
    pub ziti_args: Vec<String>,
    pub command: Vec<String>,
}

/// Execute `zitilab quickstart`
///
/// Exits the process with the command's exit code when it fails.
pub fn run(config: &ReleaseConfig, args: QuickstartArgs) -> Result<()> {
    // PATH is augmented so the command can call the staged executable by name
    let options = AcquireOptions {
        add_to_path: true,
        progress: Some(progress_callback),
    };
    let staged = acquire(config, args.version.as_deref(), &options)?;
    eprintln!(
        "{} {} {} at {}",
        "✓".green().bold(),
        config.product,
        staged.version,
        staged.path.display()
    );

    let mut quickstart_args = vec!["edge".to_string(), "quickstart".to_string()];
    quickstart_args.extend(args.ziti_args);
    let process = launch(&staged.path, &quickstart_args)?;
    let grace = Duration::from_secs(args.grace);

    let health = HealthOptions {
        timeout: Duration::from_secs(args.timeout),
        ..HealthOptions::default()
    };
    if let Err(err) = poll_health(&args.health_url, &health) {
        eprintln!("{} quickstart did not become healthy", "✗".red().bold());
        return Err(stop_after_failure(process, grace, err.into()));
    }
    eprintln!("{} quickstart healthy at {}", "✓".green().bold(), args.health_url);

    let exit_code = match run_command(&args.command) {
        Ok(code) => code,
        Err(err) => return Err(stop_after_failure(process, grace, err)),
    };

    let status = terminate(process, grace)?;
    log::debug!("quickstart exited with {status}");

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Terminates `process` on a failure path and hands back the failure itself
///
/// A terminate error is only logged so it cannot mask `failure`.
fn stop_after_failure(
    process: QuickstartProcess,
    grace: Duration,
    failure: anyhow::Error,
) -> anyhow::Error {
    if let Err(err) = terminate(process, grace) {
        log::warn!("failed to stop quickstart: {err}");
    }
    failure
}

/// Runs the user command with inherited stdio; no command counts as success
fn run_command(command: &[String]) -> Result<i32> {
    let Some((program, rest)) = command.split_first() else {
        return Ok(0);
    };

    let status = Command::new(program)
        .args(rest)
        .status()
        .with_context(|| format!("failed to run {program}"))?;

    match status.code() {
        Some(code) => Ok(code),
        None => bail!("{program} terminated by signal ({status})"),
    }
}
