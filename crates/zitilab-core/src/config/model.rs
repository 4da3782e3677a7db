use super::consts::{self, env};
use crate::error::{Result, ZitilabError};
use std::path::PathBuf;
use std::time::Duration;

/// Everything the artifact resolver needs to find, download and stage a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// GitHub owner of the release repository (e.g. "openziti")
    pub repo_owner: String,
    /// GitHub repository name (e.g. "ziti")
    pub repo_name: String,
    /// Product name; prefixes asset names and names the executable
    pub product: String,
    /// Bearer token for the release API
    pub token: Option<String>,
    /// Explicit release tag; `None` means "latest"
    pub version: Option<String>,
    /// Root under which `{product}-bin/{product}-{tag}` directories are created
    pub home: PathBuf,
    /// Replaces the whole version-scoped staging directory when set
    pub bin_dir: Option<PathBuf>,
    /// Directory for in-flight downloads (system temp dir when `None`)
    pub tmp_dir: Option<PathBuf>,
    pub api_base_url: String,
    pub download_base_url: String,
    pub timeout: Duration,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            repo_owner: consts::repo::DEFAULT_OWNER.to_string(),
            repo_name: consts::repo::DEFAULT_NAME.to_string(),
            product: consts::repo::DEFAULT_PRODUCT.to_string(),
            token: None,
            version: None,
            home: default_home().unwrap_or_else(|| PathBuf::from(consts::DEFAULT_HOME_DIR_NAME)),
            bin_dir: None,
            tmp_dir: None,
            api_base_url: consts::github::DEFAULT_API_BASE_URL.to_string(),
            download_base_url: consts::github::DEFAULT_DOWNLOAD_BASE_URL.to_string(),
            timeout: consts::DEFAULT_TIMEOUT,
        }
    }
}

impl ReleaseConfig {
    /// Builds a configuration from the process environment
    ///
    /// Unset or empty variables fall back to the defaults listed in
    /// [`consts::env`](super::consts::env).
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalidValue` if `ZITI_HOME` is unset and the user's home
    /// directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let home = match get(env::HOME) {
            Some(home) => PathBuf::from(home),
            None => default_home().ok_or_else(|| ZitilabError::ConfigInvalidValue {
                field: env::HOME.to_string(),
                reason: "not set and the user home directory could not be determined"
                    .to_string(),
            })?,
        };

        let defaults = Self {
            home,
            ..Self::default()
        };

        Ok(Self {
            repo_owner: get(env::REPO_OWNER).unwrap_or(defaults.repo_owner),
            repo_name: get(env::REPO_NAME).unwrap_or(defaults.repo_name),
            token: get(env::TOKEN),
            version: get(env::VERSION_OVERRIDE),
            bin_dir: get(env::BIN_DIR).map(PathBuf::from),
            api_base_url: get(env::API_BASE_URL).unwrap_or(defaults.api_base_url),
            download_base_url: get(env::DOWNLOAD_BASE_URL).unwrap_or(defaults.download_base_url),
            ..defaults
        })
    }
}

fn default_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(consts::DEFAULT_HOME_DIR_NAME))
}
