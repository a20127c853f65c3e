//! Error types for feed retrieval.
//!
//! Every failure between "we have a feed URL" and "we have calendar text"
//! is a [`FeedError`]. The fail-soft entry points log these and carry on
//! with an empty event list; the `try_` variants hand them to the caller.

use std::fmt;
use thiserror::Error;

/// The category of a feed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedErrorCode {
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// The server answered with a non-success status.
    HttpStatus,
    /// The body is not a usable calendar document.
    InvalidResponse,
    /// The feed configuration is missing or invalid.
    ConfigurationError,
}

impl FeedErrorCode {
    /// Returns a stable snake_case name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::HttpStatus => "http_status",
            Self::InvalidResponse => "invalid_response",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for FeedErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while retrieving or reading the feed.
#[derive(Debug, Error)]
pub struct FeedError {
    code: FeedErrorCode,
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FeedError {
    /// Creates a new feed error with the given code and message.
    pub fn new(code: FeedErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::NetworkError, message)
    }

    /// Creates an HTTP status error.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(FeedErrorCode::HttpStatus, message);
        err.status = Some(status);
        err
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::InvalidResponse, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FeedErrorCode::ConfigurationError, message)
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
    pub fn code(&self) -> FeedErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status for [`FeedErrorCode::HttpStatus`] errors.
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(FeedErrorCode::NetworkError.as_str(), "network_error");
        assert_eq!(FeedErrorCode::HttpStatus.as_str(), "http_status");
        assert_eq!(FeedErrorCode::InvalidResponse.as_str(), "invalid_response");
        assert_eq!(
            FeedErrorCode::ConfigurationError.as_str(),
            "configuration_error"
        );
    }

    #[test]
    fn http_status_keeps_status() {
        let err = FeedError::http_status(404, "feed not found");
        assert_eq!(err.code(), FeedErrorCode::HttpStatus);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "feed not found");
    }

    #[test]
    fn other_errors_have_no_status() {
        assert!(FeedError::network("timeout").status().is_none());
    }

    #[test]
    fn display_includes_code() {
        let err = FeedError::invalid_response("not a calendar");
        assert_eq!(err.to_string(), "invalid_response: not a calendar");
    }

    #[test]
    fn with_source_is_exposed() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset by peer");
        let err = FeedError::network("read failed").with_source(io_err);
        assert!(err.source().is_some());
    }
}
