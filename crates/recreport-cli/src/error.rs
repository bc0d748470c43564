//! Client error types.

use thiserror::Error;

use recreport_webex::ApiError;

/// Result type for client operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid invocation - bad day count, empty site list, and so on.
    #[error("{0}")]
    Usage(String),

    /// Authentication required - tokens missing or fully expired.
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// API error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
