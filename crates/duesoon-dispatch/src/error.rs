//! Dispatch error types.

use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors that can occur while delivering a payload.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request could not be sent or the response could not be read.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The endpoint answered with a non-success status.
    #[error("Webhook rejected the payload with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The payload could not be encoded.
    #[error("Protocol error: {0}")]
    Protocol(#[from] duesoon_protocol::ProtocolError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl DispatchError {
    /// Creates a transport error from a reqwest error.
    ///
    /// The request URL is stripped, since webhook URLs embed their token.
    pub fn transport(source: reqwest::Error) -> Self {
        let source = source.without_url();
        Self::Transport {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the HTTP status for [`DispatchError::Status`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
