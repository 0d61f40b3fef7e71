//! Error types for blog payload validation.

use thiserror::Error;

/// Errors produced while turning raw JSON payloads into domain values.
///
/// The `Display` output of these variants is the exact text clients see in
/// error response bodies, so changes here are wire-visible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// One or more required fields were absent from the payload.
    #[error("Missing fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// The payload was structurally invalid, e.g. a field of the wrong type.
    #[error("Invalid {entity} payload: {message}")]
    InvalidPayload { entity: &'static str, message: String },
}

impl CoreError {
    /// Create a missing-fields error. Field order is preserved in the message.
    #[must_use]
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an invalid-payload error for the given entity kind.
    #[must_use]
    pub fn invalid_payload(entity: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            entity,
            message: message.into(),
        }
    }

    /// Check if this error was caused by the client's payload. Handlers map
    /// client errors to 400 and anything else to 500.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::MissingFields { .. } | CoreError::InvalidPayload { .. }
        )
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
