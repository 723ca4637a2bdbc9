//! Query key parsing.
//!
//! A query key has the exact form `<datasetId>_<fieldName>`. Dataset ids may
//! not contain underscores and no schema field contains one, so a well-formed
//! key splits on exactly one underscore with both sides non-empty.

use std::fmt;

/// A parsed `<datasetId>_<fieldName>` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    /// Dataset id (left of the underscore)
    pub dataset_id: String,
    /// Bare field name (right of the underscore)
    pub field: String,
}

impl QueryKey {
    /// Parses a raw key, returning None unless it splits on exactly one
    /// underscore with non-empty halves.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split('_').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return None;
        }
        Some(Self {
            dataset_id: parts[0].to_string(),
            field: parts[1].to_string(),
        })
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.dataset_id, self.field)
    }
}
