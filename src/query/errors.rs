//! Query error types.
//!
//! The taxonomy is closed: every failure a query can surface is one of these
//! three variants. No error is retried and there is no partial-result mode;
//! any failure discards the whole in-progress computation.

use thiserror::Error;

/// Result type for query validation and execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced by query validation and execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Grammar or semantic violation in the query document, or a missing
    /// sort key during ordering
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The query references a dataset id that is not loaded
    #[error("dataset not found: {0:?}")]
    DatasetNotFound(String),

    /// The final result sequence exceeds the row cap
    #[error("result too large: {0} rows")]
    ResultTooLarge(usize),
}

impl QueryError {
    /// Shorthand for an `InvalidQuery` with the given cause
    pub fn invalid(cause: impl Into<String>) -> Self {
        QueryError::InvalidQuery(cause.into())
    }

    /// Stable machine code for callers that map errors to responses
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidQuery(_) => "INVALID_QUERY",
            QueryError::DatasetNotFound(_) => "DATASET_NOT_FOUND",
            QueryError::ResultTooLarge(_) => "RESULT_TOO_LARGE",
        }
    }
}
