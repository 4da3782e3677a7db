//! Shared GitHub interaction utilities
//!
//! This module provides common functionality for interacting with GitHub:
//! - HTTP client construction with appropriate user-agent and timeouts
//! - Safe URL construction helpers
//! - The release-index and blob-download client ([`GithubReleases`])

pub mod client;
pub mod releases;
pub mod url;

// Re-exports for convenient access
pub use client::{USER_AGENT, build_client};
pub use releases::GithubReleases;
pub use url::{UrlError, add_path_segments, parse_base_url};
