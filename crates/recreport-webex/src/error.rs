//! Error types for Webex API operations.

use std::fmt;

use thiserror::Error;

/// The category of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorCode {
    /// Authentication failed or the access token is invalid/expired.
    AuthenticationFailed,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// Rate limit exceeded and the retry budget was exhausted.
    RateLimited,
    /// Server returned an error status.
    ServerError,
    /// Invalid response from the server - parse error, unexpected format.
    InvalidResponse,
    /// Resource not found (404).
    NotFound,
    /// Request was invalid (400) - bad parameters, malformed request.
    BadRequest,
    /// Local I/O failure - token file read/write.
    Io,
}

impl ApiErrorCode {
    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::Io => "io_error",
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the Webex API.
#[derive(Debug, Error)]
pub struct ApiError {
    /// The error code categorizing this error.
    code: ApiErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// HTTP status that triggered the error, when one was received.
    status: Option<u16>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    /// Creates a new API error with the given code and message.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::AuthenticationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NetworkError, message)
    }

    /// Creates a rate limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::RateLimited, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::InvalidResponse, message)
    }

    /// Creates a local I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Io, message)
    }

    /// Creates an error from a non-success HTTP status and response body.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let code = match status {
            400 => ApiErrorCode::BadRequest,
            401 | 403 => ApiErrorCode::AuthenticationFailed,
            404 => ApiErrorCode::NotFound,
            429 => ApiErrorCode::RateLimited,
            _ => ApiErrorCode::ServerError,
        };
        Self {
            code,
            message: format!("API error ({}): {}", status, body),
            status: Some(status),
            source: None,
        }
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status that triggered the error, if any.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_code() {
        assert_eq!(ApiError::from_status(400, "bad").code(), ApiErrorCode::BadRequest);
        assert_eq!(
            ApiError::from_status(401, "no").code(),
            ApiErrorCode::AuthenticationFailed
        );
        assert_eq!(ApiError::from_status(404, "gone").code(), ApiErrorCode::NotFound);
        assert_eq!(ApiError::from_status(500, "boom").code(), ApiErrorCode::ServerError);
    }

    #[test]
    fn status_is_carried() {
        let err = ApiError::from_status(503, "unavailable");
        assert_eq!(err.status(), Some(503));
        assert!(err.message().contains("503"));
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = ApiError::rate_limited("retry budget exhausted");
        let display = format!("{}", err);
        assert!(display.contains("rate_limited"));
        assert!(display.contains("retry budget exhausted"));
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ApiError::network("request failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
