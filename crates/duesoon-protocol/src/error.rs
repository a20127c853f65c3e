//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to serialize or deserialize the payload.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
