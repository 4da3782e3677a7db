use crate::github::UrlError;
use std::io;
use thiserror::Error;
use url::Url;

/// Errors surfaced by release resolution and staging
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// The running OS or CPU architecture has no release build
    #[error("UNSUPPORTED_PLATFORM: unsupported {kind}: {value}")]
    UnsupportedPlatform {
        /// "operating system" or "architecture"
        kind: &'static str,
        value: String,
    },

    /// The release exists but carries no archive for this platform
    #[error("NO_MATCHING_ASSET: release {tag} has no asset starting with '{prefix}'")]
    NoMatchingAsset { tag: String, prefix: String },

    /// An explicitly requested version cannot be used
    #[error("VERSION_NOT_FOUND: version {tag} not found: {reason}")]
    VersionNotFound { tag: String, reason: String },

    /// Transport or HTTP status failure, passed through as-is
    #[error("HTTP_ERROR: request to {url} failed: {source}")]
    Http {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    /// The archive does not contain the product executable
    #[error("EXECUTABLE_NOT_IN_ARCHIVE: '{executable}' not found in {archive}")]
    ExecutableNotInArchive { executable: String, archive: String },

    #[error("EXTRACTION_FAILED: {archive_type}: {reason}")]
    ExtractionFailed {
        archive_type: String,
        reason: String,
    },

    #[error("IO_ERROR: failed to {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("URL_ERROR: {0}")]
    Url(#[from] UrlError),
}

impl ReleaseError {
    pub(crate) fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }
}
