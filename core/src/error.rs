//! Common error types for Dex values.

use thiserror::Error;

/// Errors raised by typed value accessors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A field held a value of the wrong type.
    #[error("Type mismatch for {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// A required field was absent.
    #[error("Missing field: {field}")]
    MissingField { field: String },
}

impl CoreError {
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// Result type for value operations.
pub type CoreResult<T> = Result<T, CoreError>;
