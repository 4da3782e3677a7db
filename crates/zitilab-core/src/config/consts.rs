//! Defaults and environment variable names

use std::time::Duration;

/// Repository that publishes the product releases
pub mod repo {
    pub const DEFAULT_OWNER: &str = "openziti";
    pub const DEFAULT_NAME: &str = "ziti";
    pub const DEFAULT_PRODUCT: &str = "ziti";
}

/// GitHub endpoints
pub mod github {
    pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
    pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://github.com";
}

/// Environment variables read by [`ReleaseConfig::from_env`](super::ReleaseConfig::from_env)
pub mod env {
    pub const REPO_OWNER: &str = "GITHUB_REPO_OWNER";
    pub const REPO_NAME: &str = "GITHUB_REPO_NAME";
    pub const TOKEN: &str = "GITHUB_TOKEN";
    pub const API_BASE_URL: &str = "GITHUB_API_URL";
    pub const DOWNLOAD_BASE_URL: &str = "GITHUB_BASE_URL";
    pub const VERSION_OVERRIDE: &str = "ZITI_VERSION_OVERRIDE";
    pub const HOME: &str = "ZITI_HOME";
    pub const BIN_DIR: &str = "ZITI_BIN_DIR";
}

/// Home directory name used when `ZITI_HOME` is unset (relative to the user home)
pub const DEFAULT_HOME_DIR_NAME: &str = ".ziti";

/// Timeout for GitHub requests, sized for large release archives
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
