//! Static query validation.
//!
//! Checks an untyped, JSON-shaped query document against the grammar before
//! any data is touched, producing a `ValidatedQuery`. Validation never
//! partially succeeds: the first rule violation fails the whole document.
//!
//! The validator never consults the dataset store, so an unknown dataset id
//! still surfaces later as `DatasetNotFound` rather than `InvalidQuery`. The
//! record kind is inferred from the query's own field names (the Sections and
//! Rooms field sets are disjoint); the executor re-checks it against the
//! resolved dataset.

use std::collections::HashSet;

use serde_json::Value;

use crate::schema::{resolve_field, DatasetKind, FieldType, QueryKey};

use super::ast::{
    AggregateOp, ApplyRule, CompareOp, Filter, GroupKey, MatchPattern, Options, OrderDirection,
    OrderSpec, Transformations, ValidatedQuery,
};
use super::errors::{QueryError, QueryResult};

/// Validates one query document.
///
/// The first query key encountered fixes the dataset id; every later key must
/// reuse it.
pub struct QueryValidator {
    dataset_id: Option<String>,
    kind: Option<DatasetKind>,
}

impl QueryValidator {
    /// Validates `document` against the query grammar.
    pub fn validate(document: &Value) -> QueryResult<ValidatedQuery> {
        let doc = document
            .as_object()
            .ok_or_else(|| QueryError::invalid("query must be a JSON object"))?;

        for key in doc.keys() {
            if !matches!(key.as_str(), "WHERE" | "OPTIONS" | "TRANSFORMATIONS") {
                return Err(QueryError::invalid(format!(
                    "unknown top-level key {key:?}"
                )));
            }
        }
        let where_clause = doc
            .get("WHERE")
            .ok_or_else(|| QueryError::invalid("missing WHERE"))?;
        let options_value = doc
            .get("OPTIONS")
            .ok_or_else(|| QueryError::invalid("missing OPTIONS"))?;

        let mut validator = Self {
            dataset_id: None,
            kind: None,
        };

        let filter = validator.validate_where(where_clause)?;
        let transformations = doc
            .get("TRANSFORMATIONS")
            .map(|value| validator.validate_transformations(value))
            .transpose()?;
        let options = validator.validate_options(options_value, transformations.as_ref())?;

        // GROUP and plain COLUMNS both carry query keys, so by now at least
        // one key has resolved.
        match (validator.dataset_id, validator.kind) {
            (Some(dataset_id), Some(kind)) => Ok(ValidatedQuery {
                dataset_id,
                kind,
                filter,
                options,
                transformations,
            }),
            _ => Err(QueryError::invalid("query references no dataset")),
        }
    }

    /// An empty WHERE object matches everything; anything else is a filter.
    fn validate_where(&mut self, value: &Value) -> QueryResult<Filter> {
        match value.as_object() {
            Some(obj) if obj.is_empty() => Ok(Filter::All),
            Some(_) => self.validate_filter(value),
            None => Err(QueryError::invalid("WHERE must be an object")),
        }
    }

    fn validate_filter(&mut self, value: &Value) -> QueryResult<Filter> {
        let obj = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("filter must be an object"))?;
        if obj.len() != 1 {
            return Err(QueryError::invalid(
                "filter must hold exactly one operator",
            ));
        }
        let (operator, operand) = obj.iter().next().expect("len checked above");

        match operator.as_str() {
            "AND" | "OR" => {
                let items = operand.as_array().ok_or_else(|| {
                    QueryError::invalid(format!("{operator} requires an array of sub-filters"))
                })?;
                if items.len() < 2 {
                    return Err(QueryError::invalid(format!(
                        "{operator} requires at least two sub-filters"
                    )));
                }
                let subs = items
                    .iter()
                    .map(|item| self.validate_filter(item))
                    .collect::<QueryResult<Vec<Filter>>>()?;
                if operator == "AND" {
                    Ok(Filter::And(subs))
                } else {
                    Ok(Filter::Or(subs))
                }
            }
            "NOT" => Ok(Filter::Not(Box::new(self.validate_filter(operand)?))),
            "LT" | "GT" | "EQ" => self.validate_comparison(operator, operand),
            "IS" => self.validate_match(operand),
            _ => Err(QueryError::invalid(format!(
                "unknown filter operator {operator:?}"
            ))),
        }
    }

    fn validate_comparison(&mut self, operator: &str, operand: &Value) -> QueryResult<Filter> {
        let (raw_key, value) = single_entry(operand, operator)?;
        let (field, ftype) = self.resolve_key(raw_key)?;
        if !ftype.is_numeric() {
            return Err(QueryError::invalid(format!(
                "{operator} requires a numeric field, {raw_key:?} is {}",
                ftype.type_name()
            )));
        }
        let number = value
            .as_f64()
            .ok_or_else(|| QueryError::invalid(format!("{operator} requires a number value")))?;
        let op = match operator {
            "LT" => CompareOp::Lt,
            "GT" => CompareOp::Gt,
            _ => CompareOp::Eq,
        };
        Ok(Filter::Compare {
            op,
            field,
            value: number,
        })
    }

    fn validate_match(&mut self, operand: &Value) -> QueryResult<Filter> {
        let (raw_key, value) = single_entry(operand, "IS")?;
        let (field, ftype) = self.resolve_key(raw_key)?;
        if ftype.is_numeric() {
            return Err(QueryError::invalid(format!(
                "IS requires a string field, {raw_key:?} is numeric"
            )));
        }
        let raw_pattern = value
            .as_str()
            .ok_or_else(|| QueryError::invalid("IS requires a string value"))?;
        let pattern = MatchPattern::parse(raw_pattern).ok_or_else(|| {
            QueryError::invalid(format!(
                "wildcard in {raw_pattern:?} is only allowed at the start and/or end"
            ))
        })?;
        Ok(Filter::Match { field, pattern })
    }

    fn validate_transformations(&mut self, value: &Value) -> QueryResult<Transformations> {
        let obj = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS must be an object"))?;
        for key in obj.keys() {
            if !matches!(key.as_str(), "GROUP" | "APPLY") {
                return Err(QueryError::invalid(format!(
                    "unknown TRANSFORMATIONS key {key:?}"
                )));
            }
        }

        let group_value = obj
            .get("GROUP")
            .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS requires GROUP"))?;
        let group_items = group_value
            .as_array()
            .ok_or_else(|| QueryError::invalid("GROUP must be an array"))?;
        if group_items.is_empty() {
            return Err(QueryError::invalid("GROUP must not be empty"));
        }
        let mut group = Vec::with_capacity(group_items.len());
        for item in group_items {
            let raw = item
                .as_str()
                .ok_or_else(|| QueryError::invalid("GROUP entries must be strings"))?;
            let (field, _) = self.resolve_key(raw)?;
            group.push(GroupKey {
                key: raw.to_string(),
                field,
            });
        }

        let apply_value = obj
            .get("APPLY")
            .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS requires APPLY"))?;
        let apply_items = apply_value
            .as_array()
            .ok_or_else(|| QueryError::invalid("APPLY must be an array"))?;
        let mut seen_aliases = HashSet::new();
        let mut apply = Vec::with_capacity(apply_items.len());
        for item in apply_items {
            apply.push(self.validate_apply_rule(item, &mut seen_aliases)?);
        }

        Ok(Transformations { group, apply })
    }

    fn validate_apply_rule(
        &mut self,
        item: &Value,
        seen_aliases: &mut HashSet<String>,
    ) -> QueryResult<ApplyRule> {
        let (alias, body) = single_entry(item, "APPLY rule")?;
        if alias.is_empty() || alias.contains('_') {
            return Err(QueryError::invalid(format!(
                "apply alias {alias:?} must be a non-empty name without underscores"
            )));
        }
        if !seen_aliases.insert(alias.to_string()) {
            return Err(QueryError::invalid(format!(
                "duplicate apply alias {alias:?}"
            )));
        }

        let (op_name, target) = single_entry(body, "apply body")?;
        let op = AggregateOp::parse(op_name).ok_or_else(|| {
            QueryError::invalid(format!("unknown aggregation operator {op_name:?}"))
        })?;
        let raw_target = target
            .as_str()
            .ok_or_else(|| QueryError::invalid(format!("{op_name} target must be a query key")))?;
        let (field, ftype) = self.resolve_key(raw_target)?;
        if op.requires_numeric() && !ftype.is_numeric() {
            return Err(QueryError::invalid(format!(
                "{op_name} requires a numeric field, {raw_target:?} is string"
            )));
        }

        Ok(ApplyRule {
            alias: alias.to_string(),
            op,
            field,
        })
    }

    fn validate_options(
        &mut self,
        value: &Value,
        transformations: Option<&Transformations>,
    ) -> QueryResult<Options> {
        let obj = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("OPTIONS must be an object"))?;
        for key in obj.keys() {
            if !matches!(key.as_str(), "COLUMNS" | "ORDER") {
                return Err(QueryError::invalid(format!("unknown OPTIONS key {key:?}")));
            }
        }

        let columns_value = obj
            .get("COLUMNS")
            .ok_or_else(|| QueryError::invalid("OPTIONS requires COLUMNS"))?;
        let column_items = columns_value
            .as_array()
            .ok_or_else(|| QueryError::invalid("COLUMNS must be an array"))?;
        if column_items.is_empty() {
            return Err(QueryError::invalid("COLUMNS must not be empty"));
        }

        let mut columns = Vec::with_capacity(column_items.len());
        for item in column_items {
            let raw = item
                .as_str()
                .ok_or_else(|| QueryError::invalid("COLUMNS entries must be strings"))?;
            match transformations {
                // Without transformations every column is a query key.
                None => {
                    self.resolve_key(raw)?;
                }
                // With transformations a column must be a GROUP key or an
                // APPLY alias; raw ungrouped keys are invalid here.
                Some(transforms) => {
                    let grouped = transforms.group.iter().any(|g| g.key == raw);
                    let aliased = transforms.apply.iter().any(|a| a.alias == raw);
                    if !grouped && !aliased {
                        return Err(QueryError::invalid(format!(
                            "column {raw:?} must be a GROUP key or an APPLY alias"
                        )));
                    }
                }
            }
            columns.push(raw.to_string());
        }

        let order = obj
            .get("ORDER")
            .map(|order_value| Self::validate_order(order_value, &columns))
            .transpose()?;

        Ok(Options { columns, order })
    }

    fn validate_order(value: &Value, columns: &[String]) -> QueryResult<OrderSpec> {
        match value {
            Value::String(key) => {
                if !columns.iter().any(|c| c == key) {
                    return Err(QueryError::invalid(format!(
                        "ORDER key {key:?} is not in COLUMNS"
                    )));
                }
                Ok(OrderSpec {
                    direction: OrderDirection::Up,
                    keys: vec![key.clone()],
                })
            }
            Value::Object(obj) => {
                for key in obj.keys() {
                    if !matches!(key.as_str(), "dir" | "keys") {
                        return Err(QueryError::invalid(format!("unknown ORDER key {key:?}")));
                    }
                }
                let direction = match obj.get("dir").and_then(Value::as_str) {
                    Some("UP") => OrderDirection::Up,
                    Some("DOWN") => OrderDirection::Down,
                    _ => return Err(QueryError::invalid("ORDER dir must be UP or DOWN")),
                };
                let keys = obj
                    .get("keys")
                    .and_then(Value::as_array)
                    .ok_or_else(|| QueryError::invalid("ORDER keys must be an array"))?;
                if keys.is_empty() {
                    return Err(QueryError::invalid("ORDER keys must not be empty"));
                }
                let mut order_keys = Vec::with_capacity(keys.len());
                for key in keys {
                    let raw = key
                        .as_str()
                        .ok_or_else(|| QueryError::invalid("ORDER keys must be strings"))?;
                    if !columns.iter().any(|c| c == raw) {
                        return Err(QueryError::invalid(format!(
                            "ORDER key {raw:?} is not in COLUMNS"
                        )));
                    }
                    order_keys.push(raw.to_string());
                }
                Ok(OrderSpec {
                    direction,
                    keys: order_keys,
                })
            }
            _ => Err(QueryError::invalid("ORDER must be a string or an object")),
        }
    }

    /// Parses a raw query key, checks the field against the schema, and
    /// enforces the single-dataset invariant.
    fn resolve_key(&mut self, raw: &str) -> QueryResult<(String, FieldType)> {
        let key = QueryKey::parse(raw)
            .ok_or_else(|| QueryError::invalid(format!("malformed query key {raw:?}")))?;
        let (kind, ftype) = resolve_field(&key.field)
            .ok_or_else(|| QueryError::invalid(format!("unknown field {:?}", key.field)))?;

        match &self.dataset_id {
            None => self.dataset_id = Some(key.dataset_id.clone()),
            Some(existing) if *existing != key.dataset_id => {
                return Err(QueryError::invalid(format!(
                    "query references two datasets: {existing:?} and {:?}",
                    key.dataset_id
                )));
            }
            Some(_) => {}
        }
        match self.kind {
            None => self.kind = Some(kind),
            Some(existing) if existing != kind => {
                return Err(QueryError::invalid(format!(
                    "field {:?} does not belong to a {existing} dataset",
                    key.field
                )));
            }
            Some(_) => {}
        }

        Ok((key.field, ftype))
    }
}

/// Unwraps an object holding exactly one entry
fn single_entry<'a>(value: &'a Value, context: &str) -> QueryResult<(&'a str, &'a Value)> {
    let obj = value
        .as_object()
        .ok_or_else(|| QueryError::invalid(format!("{context} must be an object")))?;
    if obj.len() != 1 {
        return Err(QueryError::invalid(format!(
            "{context} must hold exactly one key"
        )));
    }
    let (key, inner) = obj.iter().next().expect("len checked above");
    Ok((key.as_str(), inner))
}
