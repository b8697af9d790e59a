//! Dex Core Types
//!
//! This crate provides the foundational types used throughout Dex:
//! - Value types (the Value enum with scalar, array and document variants)
//! - Documents (ordered, schema-less records addressed by dotted paths)
//! - Well-known collection and field names
//! - JSON conversion
//! - Common error types

mod document;
mod error;
pub mod json;
mod names;
mod value;

pub use document::*;
pub use error::*;
pub use names::*;
pub use value::*;
