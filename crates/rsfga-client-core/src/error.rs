//! Client error types for batch tuple operations.

use thiserror::Error;

/// Errors produced by the RSFGA client.
///
/// Validation errors are raised before any request is sent. Transport and
/// service errors are captured per chunk during a batch write and surface
/// through the batch outcome rather than being returned directly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Invalid parameters or a request that exceeds server limits.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Network, timeout, or protocol failure talking to the server.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status.
    #[error("service error (HTTP {status}, {code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    /// One or more chunks of a batch write failed without a recorded error.
    #[error("batch write failed: {failed_chunks} of {total_chunks} chunks failed")]
    AggregateFailure {
        failed_chunks: usize,
        total_chunks: usize,
    },

    /// Request or response body could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ClientError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            message: message.into(),
        }
    }

    /// Returns true if the error is likely transient.
    ///
    /// Transport failures, rate limiting (429), and 5xx responses are
    /// transient. Everything else will fail again on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport { .. } => true,
            ClientError::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
