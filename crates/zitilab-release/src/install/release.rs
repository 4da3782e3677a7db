//! GitHub release metadata

use serde::{Deserialize, Serialize};

/// GitHub Release metadata from API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    /// Release tag name (e.g., "v1.1.3")
    pub tag_name: String,
    /// List of downloadable assets
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// GitHub Release asset (downloadable file)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    /// Asset filename (e.g., "ziti-linux-amd64-1.1.3.tar.gz")
    pub name: String,
    /// File size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub browser_download_url: Option<String>,
}

/// A published version together with the archive chosen for this platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef {
    pub tag: String,
    pub archive_name: String,
}
