//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response not covered by a more specific variant
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input, either locally or by the backend (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// The backend answered, but the payload could not be decoded.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::InvalidResponse(_))
    }

    /// HTTP status code, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<shared::ValidationError> for ClientError {
    fn from(err: shared::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
