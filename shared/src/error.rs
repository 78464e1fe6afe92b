//! Error types for the shared crate

use thiserror::Error;

/// Client-side input validation failure
///
/// Carries the offending field so front-ends can point at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Field name as it appears on the wire
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
