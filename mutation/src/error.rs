//! Mutation error types.

use dex_core::CoreError;
use dex_store::StoreError;
use thiserror::Error;

/// Result type for mutation operations.
pub type MutationResult<T> = Result<T, MutationError>;

/// Errors that can occur during mutation execution.
///
/// Every error is raised before the first write, so a failed mutation leaves
/// the dataset as it was.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Validation failed for {collection}: missing required fields {}", .missing.join(", "))]
    Validation {
        collection: String,
        missing: Vec<String>,
    },

    #[error("Invalid field type: expected {expected}, got {actual} for {field}")]
    InvalidFieldType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Field {field} value {value:?} does not match pattern {pattern}")]
    PatternViolation {
        field: String,
        pattern: String,
        value: String,
    },

    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl MutationError {
    pub fn validation(collection: impl Into<String>, missing: Vec<String>) -> Self {
        Self::Validation {
            collection: collection.into(),
            missing,
        }
    }

    pub fn invalid_field_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldType {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn pattern_violation(
        field: impl Into<String>,
        pattern: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::PatternViolation {
            field: field.into(),
            pattern: pattern.into(),
            value: value.into(),
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from schema validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidFieldType { .. } | Self::PatternViolation { .. }
        )
    }
}
