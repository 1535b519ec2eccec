//! CLI error types.

use std::fmt;

use rustore_fetch::FetchError;

/// Errors that end the CLI with a non-zero exit code.
#[derive(Debug)]
pub enum CliError {
    /// The package identifier argument is unusable.
    InvalidPackage(FetchError),

    /// The fetch pipeline failed.
    Fetch(FetchError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidPackage(e) => write!(f, "{}", e),
            CliError::Fetch(e) => write!(f, "Ошибка загрузки: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::InvalidPackage(e) => Some(e),
            CliError::Fetch(e) => Some(e),
        }
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}
