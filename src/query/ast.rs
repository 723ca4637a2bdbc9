//! Validated query structures.
//!
//! Everything here is produced by the validator and consumed by the executor.
//! All structures are request-scoped: built at query start, dropped at query
//! end.

use crate::schema::DatasetKind;

/// Numeric comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Strict less-than
    Lt,
    /// Strict greater-than
    Gt,
    /// Exact equality
    Eq,
}

impl CompareOp {
    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Lt => "LT",
            CompareOp::Gt => "GT",
            CompareOp::Eq => "EQ",
        }
    }
}

/// A string match pattern with optional leading/trailing wildcards.
///
/// `*x*` means contains, `x*` starts-with, `*x` ends-with, bare `x` exact
/// equality. Matching is case-sensitive with no locale folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPattern {
    text: String,
    leading_wildcard: bool,
    trailing_wildcard: bool,
}

impl MatchPattern {
    /// Parses a raw pattern, rejecting interior wildcards
    pub fn parse(raw: &str) -> Option<Self> {
        let mut text = raw;
        let leading_wildcard = text.starts_with('*');
        if leading_wildcard {
            text = &text[1..];
        }
        let trailing_wildcard = text.ends_with('*');
        if trailing_wildcard {
            text = &text[..text.len() - 1];
        }
        if text.contains('*') {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            leading_wildcard,
            trailing_wildcard,
        })
    }

    /// Tests a field value against the pattern
    pub fn matches(&self, value: &str) -> bool {
        match (self.leading_wildcard, self.trailing_wildcard) {
            (true, true) => value.contains(&self.text),
            (false, true) => value.starts_with(&self.text),
            (true, false) => value.ends_with(&self.text),
            (false, false) => value == self.text,
        }
    }
}

/// The validated form of a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record (empty WHERE)
    All,
    /// Conjunction of at least two sub-filters
    And(Vec<Filter>),
    /// Disjunction of at least two sub-filters
    Or(Vec<Filter>),
    /// Negation
    Not(Box<Filter>),
    /// Strict numeric comparison against a record field
    Compare {
        op: CompareOp,
        field: String,
        value: f64,
    },
    /// Wildcard string match against a record field
    Match { field: String, pattern: MatchPattern },
}

/// Aggregation operators usable in APPLY rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl AggregateOp {
    /// Parses the wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MAX" => Some(AggregateOp::Max),
            "MIN" => Some(AggregateOp::Min),
            "AVG" => Some(AggregateOp::Avg),
            "SUM" => Some(AggregateOp::Sum),
            "COUNT" => Some(AggregateOp::Count),
            _ => None,
        }
    }

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Max => "MAX",
            AggregateOp::Min => "MIN",
            AggregateOp::Avg => "AVG",
            AggregateOp::Sum => "SUM",
            AggregateOp::Count => "COUNT",
        }
    }

    /// COUNT works on any field; the arithmetic operators need numbers
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, AggregateOp::Count)
    }
}

/// One GROUP entry: the full query key plus its bare field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKey {
    /// Full `<id>_<field>` key as written in the query
    pub key: String,
    /// Bare field name used against records
    pub field: String,
}

/// One APPLY entry: `alias: {AGG: target}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRule {
    /// Output column name (bare, no underscore)
    pub alias: String,
    /// Aggregation operator
    pub op: AggregateOp,
    /// Bare field name the aggregation reads
    pub field: String,
}

/// Validated TRANSFORMATIONS block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformations {
    /// Group keys, in declaration order
    pub group: Vec<GroupKey>,
    /// Apply rules, in declaration order
    pub apply: Vec<ApplyRule>,
}

/// Sort direction; DOWN reverses the whole multi-key comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Up,
    Down,
}

/// Validated ORDER clause.
///
/// A plain-string ORDER normalizes to direction UP with a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub direction: OrderDirection,
    /// Column names (full keys or aliases), compared left-to-right
    pub keys: Vec<String>,
}

/// Validated OPTIONS block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Output column names in declaration order
    pub columns: Vec<String>,
    pub order: Option<OrderSpec>,
}

/// A fully validated query, ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedQuery {
    /// The single dataset id every key in the document references
    pub dataset_id: String,
    /// Record kind inferred from the query's field names
    pub kind: DatasetKind,
    pub filter: Filter,
    pub options: Options,
    pub transformations: Option<Transformations>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_contains() {
        let p = MatchPattern::parse("*Tables*").unwrap();
        assert!(p.matches("Movable Tables & Chairs"));
        assert!(!p.matches("Fixed Seating"));
    }

    #[test]
    fn test_pattern_starts_and_ends_with() {
        let starts = MatchPattern::parse("cp*").unwrap();
        assert!(starts.matches("cpsc"));
        assert!(!starts.matches("scpc"));

        let ends = MatchPattern::parse("*sc").unwrap();
        assert!(ends.matches("cpsc"));
        assert!(!ends.matches("scpc"));
    }

    #[test]
    fn test_pattern_exact() {
        let p = MatchPattern::parse("cpsc").unwrap();
        assert!(p.matches("cpsc"));
        assert!(!p.matches("cpsc110"));
    }

    #[test]
    fn test_pattern_is_case_sensitive() {
        let p = MatchPattern::parse("*Tables*").unwrap();
        assert!(!p.matches("movable tables"));
    }

    #[test]
    fn test_bare_and_double_wildcard_match_everything() {
        for raw in ["*", "**"] {
            let p = MatchPattern::parse(raw).unwrap();
            assert!(p.matches(""));
            assert!(p.matches("anything"));
        }
    }

    #[test]
    fn test_interior_wildcard_rejected() {
        assert_eq!(MatchPattern::parse("a*b"), None);
        assert_eq!(MatchPattern::parse("*a*b*"), None);
    }

    #[test]
    fn test_aggregate_op_wire_names() {
        for (name, op) in [
            ("MAX", AggregateOp::Max),
            ("MIN", AggregateOp::Min),
            ("AVG", AggregateOp::Avg),
            ("SUM", AggregateOp::Sum),
            ("COUNT", AggregateOp::Count),
        ] {
            assert_eq!(AggregateOp::parse(name), Some(op));
            assert_eq!(op.as_str(), name);
        }
        assert_eq!(AggregateOp::parse("MEDIAN"), None);
        assert!(!AggregateOp::Count.requires_numeric());
        assert!(AggregateOp::Sum.requires_numeric());
    }
}
