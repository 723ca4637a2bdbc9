//! Grouping and aggregation.
//!
//! Partitions filtered records into groups by composite key and computes one
//! synthetic output record per group. Group emission order is the order of
//! first occurrence of each distinct composite key in the filtered sequence.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use serde_json::{Number, Value};

use crate::catalog::Record;
use crate::query::{AggregateOp, ApplyRule, GroupKey, Transformations};

/// Records sharing identical values for every group key
pub struct Group<'a> {
    /// Members in filtered order; never empty
    pub members: Vec<&'a Record>,
}

/// Partitions records and computes aggregate rows
pub struct GroupingEngine;

impl GroupingEngine {
    /// Partitions `records` by the composite of `keys`, first-seen order.
    ///
    /// Composite equality is exact: two records share a group iff every
    /// group-key field holds the same type and value.
    pub fn group<'a>(records: &[&'a Record], keys: &[GroupKey]) -> Vec<Group<'a>> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Group<'a>> = Vec::new();

        for record in records {
            let composite = composite_key(record, keys);
            match index.entry(composite) {
                Entry::Occupied(entry) => groups[*entry.get()].members.push(record),
                Entry::Vacant(entry) => {
                    entry.insert(groups.len());
                    groups.push(Group {
                        members: vec![record],
                    });
                }
            }
        }

        groups
    }

    /// Produces one output record per group: every GROUP key under its full
    /// query-key name (taken from a representative member) plus every APPLY
    /// alias.
    pub fn aggregate(groups: &[Group<'_>], transformations: &Transformations) -> Vec<Record> {
        groups
            .iter()
            .map(|group| Self::aggregate_group(group, transformations))
            .collect()
    }

    fn aggregate_group(group: &Group<'_>, transformations: &Transformations) -> Record {
        let mut row = Record::new();
        // All members share the group-key values, so any representative works.
        let representative = group.members[0];
        for key in &transformations.group {
            row.insert(
                key.key.clone(),
                representative.get(&key.field).cloned().unwrap_or(Value::Null),
            );
        }
        for rule in &transformations.apply {
            row.insert(rule.alias.clone(), Self::apply_rule(rule, &group.members));
        }
        row
    }

    fn apply_rule(rule: &ApplyRule, members: &[&Record]) -> Value {
        match rule.op {
            AggregateOp::Count => count_distinct(members, &rule.field),
            AggregateOp::Max => extremum(members, &rule.field, true),
            AggregateOp::Min => extremum(members, &rule.field, false),
            AggregateOp::Sum => decimal_sum(members, &rule.field)
                .map(|sum| round_to_number(&sum))
                .unwrap_or(Value::Null),
            AggregateOp::Avg => {
                let (sum, count) = match decimal_sum_with_count(members, &rule.field) {
                    Some(pair) => pair,
                    None => return Value::Null,
                };
                round_to_number(&(sum / BigDecimal::from(count)))
            }
        }
    }
}

/// Canonical composite key: serialized key values joined by a separator that
/// cannot appear inside a JSON literal
fn composite_key(record: &Record, keys: &[GroupKey]) -> String {
    let parts: Vec<String> = keys
        .iter()
        .map(|key| canonical_value(record.get(&key.field)))
        .collect();
    parts.join("\u{1f}")
}

fn canonical_value(value: Option<&Value>) -> String {
    match value {
        Some(v) => serde_json::to_string(v).unwrap_or_default(),
        None => "null".to_string(),
    }
}

/// Number of distinct values of `field`; missing values are excluded
fn count_distinct(members: &[&Record], field: &str) -> Value {
    let mut seen = HashSet::new();
    for member in members {
        if let Some(value) = member.get(field) {
            seen.insert(canonical_value(Some(value)));
        }
    }
    Value::from(seen.len() as u64)
}

/// Numeric max/min, preserving the winning value verbatim; null if the group
/// has no numeric entries
fn extremum(members: &[&Record], field: &str, take_max: bool) -> Value {
    let mut best: Option<(f64, &Value)> = None;
    for member in members {
        let value = match member.get(field) {
            Some(v) => v,
            None => continue,
        };
        let number = match value.as_f64() {
            Some(n) => n,
            None => continue,
        };
        let better = match best {
            None => true,
            Some((current, _)) => {
                if take_max {
                    number > current
                } else {
                    number < current
                }
            }
        };
        if better {
            best = Some((number, value));
        }
    }
    best.map(|(_, value)| value.clone()).unwrap_or(Value::Null)
}

fn decimal_sum(members: &[&Record], field: &str) -> Option<BigDecimal> {
    decimal_sum_with_count(members, field).map(|(sum, _)| sum)
}

/// Sums the field over a decimal-accurate accumulator, skipping non-numeric
/// entries; None when the group has no numeric contributors
fn decimal_sum_with_count(members: &[&Record], field: &str) -> Option<(BigDecimal, u64)> {
    let mut sum = BigDecimal::from(0);
    let mut count = 0u64;
    for member in members {
        let number = match member.get(field) {
            Some(Value::Number(n)) => n,
            _ => continue,
        };
        // The JSON literal round-trips exactly, unlike an f64 detour.
        let decimal = match BigDecimal::from_str(&number.to_string()) {
            Ok(d) => d,
            Err(_) => continue,
        };
        sum += decimal;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some((sum, count))
    }
}

/// Rounds half-up to 2 decimal places and emits a JSON number.
///
/// Goes through the decimal string so the result is the correctly-rounded
/// double for that literal, the same value the JSON parser would produce.
fn round_to_number(value: &BigDecimal) -> Value {
    let rounded = value.with_scale_round(2, RoundingMode::HalfUp);
    rounded
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
