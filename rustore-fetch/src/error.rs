//! Error types for the fetch pipeline.
//!
//! Only failures that abort a run are represented here. Backend-reported
//! failures (a `code` other than `"OK"`) are ordinary outcomes, see
//! [`crate::fetcher::FetchOutcome`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that abort a fetch run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build the HTTP client.
    #[error("failed to create HTTP client: {0}")]
    ClientInit(String),

    /// Transport-level failure (connection refused, TLS, non-success status).
    #[error("HTTP request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// Request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Backend answered with a body that is not the expected JSON.
    #[error("invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// Failed to read a file.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Package identifier cannot be used in a URL path or file name.
    #[error("invalid package identifier '{0}'")]
    InvalidPackageId(String),
}

impl FetchError {
    /// Map a reqwest error for `url`, distinguishing timeouts.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_secs,
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}
