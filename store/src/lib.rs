//! Dex Store
//!
//! The dataset store: named collections of documents held in memory.
//!
//! Responsibilities:
//! - Register collections and look documents up by `_id`
//! - Insert, update and delete single documents
//! - Normalize string-encoded numbers and `"null"` references at ingestion
//! - Import JSON fixture files

mod collection;
mod config;
mod dataset;
mod error;
mod index;
pub mod loader;
mod normalize;

pub use collection::Collection;
pub use config::{LoaderConfig, DATA_DIR_ENV, DEFAULT_DATA_FOLDER};
pub use dataset::Dataset;
pub use error::{StoreError, StoreResult};
pub use loader::{load_dir, load_str, FileReport, ImportSummary};
pub use normalize::{FieldRules, Normalizer};
