//! Dex Query
//!
//! Evaluate aggregation pipelines over the dataset.
//!
//! Responsibilities:
//! - Describe pipelines as data (stages, expressions, predicates, accumulators)
//! - Validate pipeline preconditions before running
//! - Execute stages in order over materialized document streams
//! - Provide the canonical Pokémon queries

mod aggregates;
pub mod catalog;
mod config;
mod error;
mod executor;
mod expr;
mod operators;
mod stage;

pub use aggregates::{compute_aggregate, Accumulator};
pub use catalog::CatalogQuery;
pub use config::ExecutorConfig;
pub use error::{QueryError, QueryResult};
pub use executor::PipelineExecutor;
pub use expr::{CmpOp, Expr, Predicate};
pub use operators::{compare_sort_values, OperatorContext};
pub use stage::{
    AccumulatorSpec, GraphLookupSpec, GroupSpec, LookupSpec, Pipeline, ProjectField, Projection,
    SortDirection, SortKey, Stage, UnwindSpec,
};
