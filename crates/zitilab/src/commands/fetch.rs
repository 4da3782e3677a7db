//! Fetch command - resolve, download and stage the executable

use crate::output::{print_json, print_text, progress_callback};
use anyhow::Result;
use colored::Colorize;
use zitilab_core::ReleaseConfig;
use zitilab_release::{AcquireOptions, acquire};

/// Execute `zitilab fetch`
///
/// The staged path (or JSON) goes to stdout; status lines go to stderr so the
/// output can be captured by scripts.
pub fn run(
    config: &ReleaseConfig,
    version: Option<String>,
    add_to_path: bool,
    json: bool,
) -> Result<()> {
    let options = AcquireOptions {
        add_to_path,
        progress: if json { None } else { Some(progress_callback) },
    };

    let staged = acquire(config, version.as_deref(), &options)?;

    if json {
        print_json(&serde_json::to_string_pretty(&staged)?)?;
        return Ok(());
    }

    eprintln!(
        "{} {} {} staged",
        "✓".green().bold(),
        config.product,
        staged.version
    );
    print_text(&staged.path.display().to_string())?;
    Ok(())
}
