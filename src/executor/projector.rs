//! Result projection.
//!
//! Selects the requested columns into output rows, values copied verbatim.
//! Output rows keep the COLUMNS declaration order (the crate relies on
//! serde_json's preserve_order map).

use serde_json::Value;

use crate::catalog::Record;
use crate::schema::QueryKey;

use super::result::ResultRow;

/// Builds output rows from the working record set
pub struct RowProjector;

impl RowProjector {
    /// Projects raw dataset records: a column `<id>_<field>` reads the bare
    /// `field` of each record.
    pub fn project_records(records: &[&Record], columns: &[String]) -> Vec<ResultRow> {
        records
            .iter()
            .map(|record| {
                let mut row = ResultRow::new();
                for column in columns {
                    let value = QueryKey::parse(column)
                        .and_then(|key| record.get(&key.field).cloned())
                        .unwrap_or(Value::Null);
                    row.insert(column.clone(), value);
                }
                row
            })
            .collect()
    }

    /// Projects synthetic aggregation rows, which already carry full query
    /// keys and aliases as field names.
    pub fn project_rows(rows: &[Record], columns: &[String]) -> Vec<ResultRow> {
        rows.iter()
            .map(|source| {
                let mut row = ResultRow::new();
                for column in columns {
                    row.insert(
                        column.clone(),
                        source.get(column).cloned().unwrap_or(Value::Null),
                    );
                }
                row
            })
            .collect()
    }
}
