//! HTTPS health polling

use crate::error::SupervisorError;
use log::debug;
use reqwest::blocking::Client;
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for a single health request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct HealthOptions {
    /// Total time to wait for a 2xx answer
    pub timeout: Duration,
    /// Pause between attempts
    pub interval: Duration,
    /// Accept self-signed certificates (quickstart controllers use them)
    pub accept_invalid_certs: bool,
}

impl Default for HealthOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            interval: Duration::from_secs(1),
            accept_invalid_certs: true,
        }
    }
}

/// Polls `url` until it answers with a 2xx status
///
/// Connection failures and non-2xx responses count as "not ready yet" and are
/// retried every `interval` until `timeout` has elapsed.
///
/// # Errors
///
/// - `HealthTimeout` when the deadline passes without a 2xx answer
/// - `Client` when the HTTP client cannot be built
pub fn poll_health(url: &str, options: &HealthOptions) -> Result<(), SupervisorError> {
    let client = Client::builder()
        .danger_accept_invalid_certs(options.accept_invalid_certs)
        .timeout(REQUEST_TIMEOUT.min(options.timeout.max(Duration::from_millis(100))))
        .build()
        .map_err(SupervisorError::Client)?;

    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match client.get(url).send() {
            Ok(response) if response.status().is_success() => {
                debug!("{url} healthy after {attempt} attempt(s)");
                return Ok(());
            }
            Ok(response) => debug!("{url} answered {} (attempt {attempt})", response.status()),
            Err(err) => debug!("{url} not reachable (attempt {attempt}): {err}"),
        }

        let waited = started.elapsed();
        if waited >= options.timeout {
            return Err(SupervisorError::HealthTimeout {
                url: url.to_string(),
                waited,
            });
        }
        thread::sleep(options.interval.min(options.timeout - waited));
    }
}
