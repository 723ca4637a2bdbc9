//! CLI error types.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::query::QueryError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced by the command-line surface
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed dataset file or unusable argument
    #[error("data error: {0}")]
    Data(String),

    /// Filesystem failure reading or writing the data directory
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Unparsable JSON input
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Registry operation failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Query validation or execution failed
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CliError {
    /// Shorthand for a `Data` error
    pub fn data(msg: impl Into<String>) -> Self {
        CliError::Data(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_errors_pass_through_verbatim() {
        let err: CliError = QueryError::invalid("missing WHERE").into();
        assert_eq!(err.to_string(), "invalid query: missing WHERE");
    }

    #[test]
    fn test_catalog_errors_pass_through_verbatim() {
        let err: CliError = CatalogError::NotFound("courses".into()).into();
        assert!(err.to_string().contains("courses"));
    }
}
