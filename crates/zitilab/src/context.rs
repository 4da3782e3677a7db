//! Release configuration for CLI commands

use crate::cli::RepoArgs;
use anyhow::Result;
use zitilab_core::ReleaseConfig;

/// Builds the configuration from the environment, then applies CLI overrides
///
/// # Errors
///
/// Returns an error if the environment configuration is unusable (no home
/// directory and no `ZITI_HOME`).
pub fn release_config(overrides: &RepoArgs) -> Result<ReleaseConfig> {
    let mut config = ReleaseConfig::from_env()?;

    if let Some(owner) = &overrides.owner {
        config.repo_owner = owner.clone();
    }
    if let Some(repo) = &overrides.repo {
        config.repo_name = repo.clone();
    }
    if let Some(home) = &overrides.home {
        config.home = home.clone();
    }

    log::debug!(
        "release repository {}/{}, home {}",
        config.repo_owner,
        config.repo_name,
        config.home.display()
    );
    Ok(config)
}
