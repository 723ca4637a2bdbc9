//! Result sorting.
//!
//! Stable multi-key sort over projected rows. Keys compare left-to-right and
//! the first non-equal comparison decides; DOWN reverses the whole
//! comparison, not individual keys.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::{OrderDirection, OrderSpec, QueryError, QueryResult};

use super::result::ResultRow;

/// Sorts projected rows according to an ORDER clause
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts in place; stable, so rows with equal keys keep their relative
    /// order.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidQuery` if any row is missing one of the sort keys;
    /// a missing key never silently sorts as smallest.
    pub fn sort(rows: &mut [ResultRow], order: &OrderSpec) -> QueryResult<()> {
        for key in &order.keys {
            if rows.iter().any(|row| row.get(key).is_none()) {
                return Err(QueryError::invalid(format!(
                    "sort key {key:?} is missing on at least one result row"
                )));
            }
        }

        rows.sort_by(|a, b| {
            let mut ordering = Ordering::Equal;
            for key in &order.keys {
                ordering = compare_values(&a[key], &b[key]);
                if ordering != Ordering::Equal {
                    break;
                }
            }
            match order.direction {
                OrderDirection::Up => ordering,
                OrderDirection::Down => ordering.reverse(),
            }
        });
        Ok(())
    }
}

/// Natural ordering: numeric `<` for numbers, lexicographic for strings.
/// Mixed types order by a fixed type rank so the sort stays total.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a_n), Value::Number(b_n)) => {
            let a_f = a_n.as_f64().unwrap_or(0.0);
            let b_f = b_n.as_f64().unwrap_or(0.0);
            a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
        }
        (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
