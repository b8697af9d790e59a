//! Error types for the scenario harness.

use std::path::PathBuf;

use dex_store::StoreError;
use thiserror::Error;

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to seed {collection}: {message}")]
    Seed { collection: String, message: String },

    #[error("Failed to write fixture {path}: {source}")]
    FixtureWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Step '{step}' failed assertion: {message}")]
    AssertionFailed { step: String, message: String },
}

impl ScenarioError {
    pub fn seed(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Seed {
            collection: collection.into(),
            message: message.into(),
        }
    }

    pub fn fixture_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FixtureWrite {
            path: path.into(),
            source,
        }
    }

    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}
