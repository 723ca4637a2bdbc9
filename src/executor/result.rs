//! Result types for query execution.

use serde_json::{Map, Value};

/// One output row: requested column name → value, in COLUMNS order
pub type ResultRow = Map<String, Value>;

/// Result of query execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Rows in result order
    pub rows: Vec<ResultRow>,
    /// Number of records scanned from the dataset
    pub scanned_count: usize,
    /// Number of records the filter matched
    pub matched_count: usize,
}

impl ExecutionResult {
    /// Returns true if no rows were produced
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }
}
