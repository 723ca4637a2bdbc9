//! Query orchestration.
//!
//! Sequences validation, dataset resolution, filtering, grouping, projection,
//! sorting, and the result-size cap. Execution is synchronous and single-pass;
//! same document + same dataset = same ordered output.

use serde_json::Value;
use tracing::debug;

use crate::catalog::{DatasetStore, Record};
use crate::query::{QueryError, QueryResult, QueryValidator};

use super::filters::RowFilter;
use super::grouping::GroupingEngine;
use super::projector::RowProjector;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;

/// Maximum number of rows a query may return.
///
/// Enforced on the final emitted sequence only, never on an intermediate
/// stage; exactly this many rows still succeeds.
pub const RESULT_CAP: usize = 5000;

/// Executes query documents against a dataset store
pub struct QueryExecutor<'a, S: DatasetStore> {
    store: &'a S,
}

impl<'a, S: DatasetStore> QueryExecutor<'a, S> {
    /// Creates an executor over the given store
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validates and executes one query document.
    ///
    /// # Errors
    ///
    /// - `InvalidQuery` for any grammar/semantic violation, a kind mismatch
    ///   against the resolved dataset, or a missing sort key
    /// - `DatasetNotFound` if the referenced dataset id is not loaded
    /// - `ResultTooLarge` if the final result exceeds [`RESULT_CAP`] rows
    pub fn execute(&self, document: &Value) -> QueryResult<ExecutionResult> {
        // Step 1: static validation, before any data is touched
        let query = QueryValidator::validate(document)?;

        // Step 2: resolve a complete snapshot of the dataset
        let dataset = self
            .store
            .snapshot(&query.dataset_id)
            .ok_or_else(|| QueryError::DatasetNotFound(query.dataset_id.clone()))?;
        if dataset.kind() != query.kind {
            return Err(QueryError::invalid(format!(
                "dataset {:?} holds {} records but the query uses {} fields",
                query.dataset_id,
                dataset.kind(),
                query.kind
            )));
        }

        // Step 3: filter in storage order; relative order is preserved
        let filter = RowFilter::new(&query.filter);
        let matched: Vec<&Record> = dataset
            .records()
            .iter()
            .filter(|record| filter.matches(record))
            .collect();
        let scanned_count = dataset.row_count();
        let matched_count = matched.len();

        // Steps 4-5: group and aggregate if requested, then project
        let mut rows = match &query.transformations {
            Some(transformations) => {
                let groups = GroupingEngine::group(&matched, &transformations.group);
                let synthetic = GroupingEngine::aggregate(&groups, transformations);
                RowProjector::project_rows(&synthetic, &query.options.columns)
            }
            None => RowProjector::project_records(&matched, &query.options.columns),
        };

        // Step 6: stable sort if ORDER is present
        if let Some(order) = &query.options.order {
            ResultSorter::sort(&mut rows, order)?;
        }

        // Step 7: cap the final emitted sequence
        if rows.len() > RESULT_CAP {
            return Err(QueryError::ResultTooLarge(rows.len()));
        }

        debug!(
            dataset = %query.dataset_id,
            scanned = scanned_count,
            matched = matched_count,
            returned = rows.len(),
            "query complete"
        );

        Ok(ExecutionResult {
            rows,
            scanned_count,
            matched_count,
        })
    }
}
