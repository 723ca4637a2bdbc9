//! Predicate evaluation for query execution.
//!
//! Compiles a validated filter tree into a reusable boolean test over one
//! record. Evaluation is purely structural with no side effects, so the
//! short-circuit order of AND/OR is unobservable.

use serde_json::Value;

use crate::catalog::Record;
use crate::query::{CompareOp, Filter};

/// Evaluates a validated filter tree against records
pub struct RowFilter<'a> {
    filter: &'a Filter,
}

impl<'a> RowFilter<'a> {
    /// Wraps a validated filter tree
    pub fn new(filter: &'a Filter) -> Self {
        Self { filter }
    }

    /// Tests one record against the tree
    pub fn matches(&self, record: &Record) -> bool {
        Self::eval(self.filter, record)
    }

    fn eval(filter: &Filter, record: &Record) -> bool {
        match filter {
            Filter::All => true,
            Filter::And(subs) => subs.iter().all(|sub| Self::eval(sub, record)),
            Filter::Or(subs) => subs.iter().any(|sub| Self::eval(sub, record)),
            Filter::Not(sub) => !Self::eval(sub, record),
            Filter::Compare { op, field, value } => {
                Self::compare(*op, record.get(field), *value)
            }
            Filter::Match { field, pattern } => match record.get(field) {
                Some(Value::String(actual)) => pattern.matches(actual),
                _ => false,
            },
        }
    }

    /// Strict numeric comparison; a missing or non-numeric field never matches
    fn compare(op: CompareOp, actual: Option<&Value>, bound: f64) -> bool {
        let actual = match actual.and_then(Value::as_f64) {
            Some(n) => n,
            None => return false,
        };
        match op {
            CompareOp::Lt => actual < bound,
            CompareOp::Gt => actual > bound,
            CompareOp::Eq => actual == bound,
        }
    }
}
