//! In-memory dataset registry.
//!
//! Datasets are stored behind `Arc` under a single `RwLock`. A query clones
//! the `Arc` while holding the read lock, so it observes either the old
//! complete dataset or the new complete one, never a partial write. Mutation
//! of one id is thereby serialized against queries on the same id; queries on
//! independent ids share nothing mutable.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

use crate::schema::DatasetKind;

use super::dataset::{Dataset, DatasetSummary, Record};
use super::errors::{CatalogError, CatalogResult};

/// Read-only view of the dataset store consumed by the query engine
pub trait DatasetStore {
    /// Checks whether a dataset with this id is loaded
    fn exists(&self, id: &str) -> bool;

    /// Returns a consistent, complete snapshot of the dataset, or None if the
    /// id is unknown
    fn snapshot(&self, id: &str) -> Option<Arc<Dataset>>;
}

struct StoredDataset {
    dataset: Arc<Dataset>,
    added_at: DateTime<Utc>,
}

/// Registry of loaded datasets, keyed by id
pub struct DatasetRegistry {
    datasets: RwLock<HashMap<String, StoredDataset>>,
}

impl DatasetRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            datasets: RwLock::new(HashMap::new()),
        }
    }

    /// Loads a dataset under `id`.
    ///
    /// # Errors
    ///
    /// - `InvalidId` if the id is empty, all-whitespace, or contains an
    ///   underscore
    /// - `DuplicateId` if a dataset with this id is already loaded
    pub fn add(&self, id: &str, kind: DatasetKind, records: Vec<Record>) -> CatalogResult<()> {
        validate_id(id)?;

        let mut datasets = self.datasets.write().unwrap();
        if datasets.contains_key(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }

        let row_count = records.len();
        datasets.insert(
            id.to_string(),
            StoredDataset {
                dataset: Arc::new(Dataset::new(id, kind, records)),
                added_at: Utc::now(),
            },
        );
        info!(dataset = id, kind = kind.as_str(), rows = row_count, "dataset added");
        Ok(())
    }

    /// Removes the dataset under `id`.
    ///
    /// # Errors
    ///
    /// - `InvalidId` if the id fails the id rules
    /// - `NotFound` if no dataset with this id is loaded
    pub fn remove(&self, id: &str) -> CatalogResult<()> {
        validate_id(id)?;

        let mut datasets = self.datasets.write().unwrap();
        if datasets.remove(id).is_none() {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        info!(dataset = id, "dataset removed");
        Ok(())
    }

    /// Lists summaries of all loaded datasets, sorted by id
    pub fn list(&self) -> Vec<DatasetSummary> {
        let datasets = self.datasets.read().unwrap();
        let mut summaries: Vec<DatasetSummary> = datasets
            .values()
            .map(|stored| DatasetSummary {
                id: stored.dataset.id().to_string(),
                kind: stored.dataset.kind(),
                row_count: stored.dataset.row_count(),
                added_at: stored.added_at,
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore for DatasetRegistry {
    fn exists(&self, id: &str) -> bool {
        self.datasets.read().unwrap().contains_key(id)
    }

    fn snapshot(&self, id: &str) -> Option<Arc<Dataset>> {
        self.datasets
            .read()
            .unwrap()
            .get(id)
            .map(|stored| Arc::clone(&stored.dataset))
    }
}

/// Id rules: non-empty, not all-whitespace, no underscore
fn validate_id(id: &str) -> CatalogResult<()> {
    if id.trim().is_empty() || id.contains('_') {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    Ok(())
}
