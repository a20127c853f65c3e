//! Client error types.

use duesoon_core::TracingError;
use duesoon_dispatch::DispatchError;
use duesoon_feed::FeedError;
use duesoon_protocol::ProtocolError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Feed retrieval failed (only surfaced by commands that do not fail soft).
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    /// Webhook delivery failed.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload or configuration could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Logging could not be initialized.
    #[error("logging setup failed: {0}")]
    Tracing(#[from] TracingError),
}

impl ClientError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<ProtocolError> for ClientError {
    fn from(err: ProtocolError) -> Self {
        Self::Encode(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Encode(format!("failed to serialize config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_error_keeps_its_code() {
        let err: ClientError = FeedError::http_status(404, "feed not found").into();
        assert_eq!(err.to_string(), "feed error: http_status: feed not found");
    }

    #[test]
    fn dispatch_status_is_reported() {
        let err: ClientError = DispatchError::Status {
            status: 401,
            body: "Invalid Webhook Token".to_string(),
        }
        .into();
        assert!(matches!(err, ClientError::Dispatch(ref e) if e.status() == Some(401)));
    }
}
