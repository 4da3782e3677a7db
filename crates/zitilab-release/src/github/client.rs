//! HTTP client construction for GitHub interactions

use reqwest::blocking::Client;
use std::time::Duration;

/// User agent sent with every request (GitHub rejects requests without one)
pub const USER_AGENT: &str = "zitilab";

/// Builds the blocking client used for both metadata and downloads
///
/// `timeout` bounds a whole request, body included, so it has to cover the
/// largest release archive.
///
/// # Errors
///
/// Returns error if client construction fails
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}
