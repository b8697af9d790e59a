//! Dataset store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing the dataset.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown collection: {name}")]
    UnknownCollection { name: String },

    #[error("Duplicate key {key} in collection {collection}")]
    DuplicateKey { collection: String, key: String },

    #[error("Key {key} not found in collection {collection}")]
    NotFound { collection: String, key: String },

    #[error("Document without a string _id cannot be stored in {collection}")]
    MissingKey { collection: String },

    #[error("Cannot change _id of {key} in collection {collection}")]
    ImmutableKey { collection: String, key: String },

    #[error("Field {field} in {collection} is not numeric: {value:?}")]
    InvalidNumeric {
        collection: String,
        field: String,
        value: String,
    },

    #[error("Data folder not found: {}", .path.display())]
    DataFolderNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn unknown_collection(name: impl Into<String>) -> Self {
        Self::UnknownCollection { name: name.into() }
    }

    pub fn duplicate_key(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            key: key.into(),
        }
    }

    pub fn not_found(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            key: key.into(),
        }
    }

    pub fn missing_key(collection: impl Into<String>) -> Self {
        Self::MissingKey {
            collection: collection.into(),
        }
    }

    pub fn immutable_key(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ImmutableKey {
            collection: collection.into(),
            key: key.into(),
        }
    }

    pub fn invalid_numeric(
        collection: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidNumeric {
            collection: collection.into(),
            field: field.into(),
            value: value.into(),
        }
    }
}
