//! Query executor subsystem for insightdb
//!
//! Consumes validated queries and produces deterministic, ordered results.
//!
//! # Execution Flow (strict order)
//!
//! 1. Statically validate the query document
//! 2. Resolve a complete snapshot of the referenced dataset
//! 3. Filter records in storage order
//! 4. Group and aggregate (only when TRANSFORMATIONS is present)
//! 5. Project the requested columns
//! 6. Stable sort (only when ORDER is present)
//! 7. Enforce the result cap on the final sequence
//!
//! Stability is a correctness requirement: no stage may observably reorder
//! its output relative to its input.

mod executor;
mod filters;
mod grouping;
mod projector;
mod result;
mod sorter;

pub use executor::{QueryExecutor, RESULT_CAP};
pub use filters::RowFilter;
pub use grouping::{Group, GroupingEngine};
pub use projector::RowProjector;
pub use result::{ExecutionResult, ResultRow};
pub use sorter::ResultSorter;
