//! Catalog error types.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by dataset registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Dataset id is empty, all-whitespace, or contains an underscore
    #[error("invalid dataset id: {0:?}")]
    InvalidId(String),

    /// A dataset with this id is already loaded
    #[error("dataset already exists: {0:?}")]
    DuplicateId(String),

    /// No dataset with this id is loaded
    #[error("dataset not found: {0:?}")]
    NotFound(String),
}

impl CatalogError {
    /// Stable machine code for callers that map errors to responses
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidId(_) => "INVALID_DATASET_ID",
            CatalogError::DuplicateId(_) => "DUPLICATE_DATASET_ID",
            CatalogError::NotFound(_) => "DATASET_NOT_FOUND",
        }
    }
}
