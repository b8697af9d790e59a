//! Dex Mutation
//!
//! Single-record writes against a loaded dataset.
//!
//! Responsibilities:
//! - Validate records against per-collection schemas
//! - Maintain trainer ownership sets
//! - Relink evolution chains
//! - Leave the dataset untouched when an operation fails
//!
//! # Module Structure
//!
//! - `executor` - Main MutationApplier that coordinates operations
//! - `ops/` - Individual operation implementations (insert, delete, reassign, relink)
//! - `validation` - Record schemas and field checks
//! - `error` - Error types for mutation failures
//! - `result` - Result types for mutation outcomes

mod error;
mod executor;
mod ops;
mod result;
mod validation;

pub use error::{MutationError, MutationResult};
pub use executor::MutationApplier;
pub use result::{DeletedDocument, InsertedDocument, MutationOutcome, UpdatedDocuments};
pub use validation::{FieldKind, RecordSchema, SchemaSet};
