//! Query error types.

use dex_store::StoreError;
use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur during pipeline evaluation.
///
/// Evaluation stops at the first error; no partial output is returned.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot unwind {path}: expected an array, found {actual}")]
    InvalidUnwindTarget { path: String, actual: String },

    #[error("Invalid {stage} value: {value} (must be non-negative)")]
    InvalidLimit { stage: String, value: i64 },

    #[error("Invalid lookup field {field}: {actual} values cannot be joined")]
    InvalidLookupField { field: String, actual: String },

    #[error("Invalid graph lookup field {field}: {actual} values cannot be followed")]
    InvalidGraphField { field: String, actual: String },

    #[error("Accumulator {accumulator} in stage {stage} requires a preceding sort")]
    UnorderedAccumulator { accumulator: String, stage: usize },

    #[error("Type error: {message}")]
    TypeError { message: String },
}

impl QueryError {
    pub fn invalid_unwind_target(path: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidUnwindTarget {
            path: path.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_limit(stage: impl Into<String>, value: i64) -> Self {
        Self::InvalidLimit {
            stage: stage.into(),
            value,
        }
    }

    pub fn invalid_lookup_field(field: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidLookupField {
            field: field.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_graph_field(field: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidGraphField {
            field: field.into(),
            actual: actual.into(),
        }
    }

    pub fn unordered_accumulator(accumulator: impl Into<String>, stage: usize) -> Self {
        Self::UnorderedAccumulator {
            accumulator: accumulator.into(),
            stage,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }
}
