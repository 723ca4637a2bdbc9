//! Dataset and record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::DatasetKind;

/// A single record: a flat mapping from bare field name to value
pub type Record = Map<String, Value>;

/// An immutable, ordered collection of homogeneous records.
///
/// Created whole by the ingestion collaborator and never mutated afterwards;
/// replacement happens by swapping the registry entry.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: String,
    kind: DatasetKind,
    records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset from already-parsed records
    pub fn new(id: impl Into<String>, kind: DatasetKind, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            kind,
            records,
        }
    }

    /// Returns the dataset id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the record kind
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Returns the records in storage order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the number of records
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Metadata describing one loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Dataset id
    pub id: String,
    /// Record kind
    pub kind: DatasetKind,
    /// Number of records
    pub row_count: usize,
    /// When the dataset was loaded into the registry
    pub added_at: DateTime<Utc>,
}
