use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The child process could not be started
    #[error("SPAWN_FAILED: failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The health endpoint never answered with a 2xx status
    #[error("HEALTH_TIMEOUT: {url} not healthy after {}s", .waited.as_secs_f64())]
    HealthTimeout { url: String, waited: Duration },

    /// The health-check HTTP client could not be built
    #[error("HTTP_CLIENT_ERROR: {0}")]
    Client(#[source] reqwest::Error),

    #[error("IO_ERROR: failed to {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl SupervisorError {
    pub(crate) fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }
}
