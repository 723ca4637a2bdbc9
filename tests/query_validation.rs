//! Query grammar validation tests
//!
//! Static validation only: no dataset is ever touched. Each rejected document
//! must fail with INVALID_QUERY and a cause describing the violated rule.

use insightdb::query::{QueryError, QueryValidator};
use serde_json::{json, Value};

fn validate(document: Value) -> Result<(), QueryError> {
    QueryValidator::validate(&document).map(|_| ())
}

fn assert_invalid(document: Value) {
    let err = validate(document).unwrap_err();
    assert_eq!(err.code(), "INVALID_QUERY", "unexpected error: {err}");
}

// =============================================================================
// Top level
// =============================================================================

#[test]
fn test_document_must_be_an_object() {
    assert_invalid(json!([]));
    assert_invalid(json!("WHERE"));
    assert_invalid(json!(null));
}

#[test]
fn test_where_and_options_are_required() {
    assert_invalid(json!({"OPTIONS": {"COLUMNS": ["sections_avg"]}}));
    assert_invalid(json!({"WHERE": {}}));
    assert_invalid(json!({}));
}

#[test]
fn test_unknown_top_level_keys_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_avg"]},
        "LIMIT": 10
    }));
}

// =============================================================================
// WHERE
// =============================================================================

#[test]
fn test_filter_with_multiple_operators_rejected() {
    assert_invalid(json!({
        "WHERE": {"GT": {"sections_avg": 90}, "LT": {"sections_avg": 95}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_unknown_operator_rejected() {
    assert_invalid(json!({
        "WHERE": {"GTE": {"sections_avg": 90}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_and_or_require_two_sub_filters() {
    assert_invalid(json!({
        "WHERE": {"AND": [{"GT": {"sections_avg": 90}}]},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
    assert_invalid(json!({
        "WHERE": {"OR": []},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
    assert_invalid(json!({
        "WHERE": {"AND": {"GT": {"sections_avg": 90}}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_empty_sub_filter_rejected() {
    // Only the top-level WHERE may be empty.
    assert_invalid(json!({
        "WHERE": {"AND": [{}, {"GT": {"sections_avg": 90}}]},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
    assert_invalid(json!({
        "WHERE": {"NOT": {}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_comparison_operand_must_hold_exactly_one_key() {
    assert_invalid(json!({
        "WHERE": {"GT": {"sections_avg": 90, "sections_pass": 10}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
    assert_invalid(json!({
        "WHERE": {"GT": {}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_comparison_value_must_be_a_number() {
    assert_invalid(json!({
        "WHERE": {"EQ": {"sections_avg": "90"}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
    assert_invalid(json!({
        "WHERE": {"LT": {"sections_avg": null}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_comparison_on_string_field_rejected() {
    assert_invalid(json!({
        "WHERE": {"GT": {"sections_dept": 90}},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    }));
}

#[test]
fn test_is_on_numeric_field_rejected() {
    assert_invalid(json!({
        "WHERE": {"IS": {"sections_avg": "90"}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_is_value_must_be_a_string() {
    assert_invalid(json!({
        "WHERE": {"IS": {"sections_dept": 90}},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    }));
}

#[test]
fn test_interior_wildcard_rejected() {
    assert_invalid(json!({
        "WHERE": {"IS": {"sections_dept": "cp*sc"}},
        "OPTIONS": {"COLUMNS": ["sections_dept"]}
    }));
}

#[test]
fn test_edge_wildcards_accepted() {
    for pattern in ["cpsc", "*psc", "cp*", "*ps*", "*", "**"] {
        assert!(validate(json!({
            "WHERE": {"IS": {"sections_dept": pattern}},
            "OPTIONS": {"COLUMNS": ["sections_dept"]}
        }))
        .is_ok());
    }
}

// =============================================================================
// Query keys
// =============================================================================

#[test]
fn test_malformed_keys_rejected() {
    for key in ["avg", "_avg", "sections_", "sections_avg_extra", ""] {
        assert_invalid(json!({
            "WHERE": {"GT": {key: 90}},
            "OPTIONS": {"COLUMNS": ["sections_avg"]}
        }));
    }
}

#[test]
fn test_unknown_field_rejected() {
    assert_invalid(json!({
        "WHERE": {"GT": {"sections_grade": 90}},
        "OPTIONS": {"COLUMNS": ["sections_avg"]}
    }));
}

#[test]
fn test_dataset_id_must_be_consistent_across_clauses() {
    // WHERE fixes "sections"; COLUMNS switches to "other".
    assert_invalid(json!({
        "WHERE": {"GT": {"sections_avg": 90}},
        "OPTIONS": {"COLUMNS": ["other_avg"]}
    }));
}

#[test]
fn test_fields_from_both_kinds_rejected_even_with_one_id() {
    // Same prefix, but avg is a sections field and seats a rooms field.
    assert_invalid(json!({
        "WHERE": {"GT": {"mixed_avg": 90}},
        "OPTIONS": {"COLUMNS": ["mixed_seats"]}
    }));
}

// =============================================================================
// OPTIONS
// =============================================================================

#[test]
fn test_columns_must_be_a_non_empty_array() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": []}
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": "sections_avg"}
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": [42]}
    }));
}

#[test]
fn test_unknown_options_key_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_avg"], "SORT": "sections_avg"}
    }));
}

#[test]
fn test_order_key_must_be_in_columns() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_avg"], "ORDER": "sections_dept"}
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["sections_avg"],
            "ORDER": {"dir": "UP", "keys": ["sections_dept"]}
        }
    }));
}

#[test]
fn test_order_object_shape_enforced() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["sections_avg"],
            "ORDER": {"dir": "DESC", "keys": ["sections_avg"]}
        }
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["sections_avg"],
            "ORDER": {"dir": "UP", "keys": []}
        }
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["sections_avg"],
            "ORDER": {"keys": ["sections_avg"]}
        }
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_avg"], "ORDER": 42}
    }));
}

// =============================================================================
// TRANSFORMATIONS
// =============================================================================

#[test]
fn test_group_must_be_non_empty() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept"]},
        "TRANSFORMATIONS": {"GROUP": [], "APPLY": []}
    }));
}

#[test]
fn test_group_and_apply_both_required() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept"]},
        "TRANSFORMATIONS": {"GROUP": ["sections_dept"]}
    }));
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept"]},
        "TRANSFORMATIONS": {"APPLY": []}
    }));
}

#[test]
fn test_empty_apply_is_allowed() {
    assert!(validate(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept"]},
        "TRANSFORMATIONS": {"GROUP": ["sections_dept"], "APPLY": []}
    }))
    .is_ok());
}

#[test]
fn test_columns_outside_group_or_apply_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept", "sections_avg"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"n": {"COUNT": "sections_uuid"}}]
        }
    }));
}

#[test]
fn test_alias_with_underscore_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept", "max_avg"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"max_avg": {"MAX": "sections_avg"}}]
        }
    }));
}

#[test]
fn test_duplicate_aliases_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept", "agg"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [
                {"agg": {"MAX": "sections_avg"}},
                {"agg": {"MIN": "sections_avg"}}
            ]
        }
    }));
}

#[test]
fn test_unknown_aggregation_operator_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept", "m"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"m": {"MEDIAN": "sections_avg"}}]
        }
    }));
}

#[test]
fn test_numeric_aggregations_reject_string_targets() {
    for agg in ["MAX", "MIN", "AVG", "SUM"] {
        assert_invalid(json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["sections_dept", "m"]},
            "TRANSFORMATIONS": {
                "GROUP": ["sections_dept"],
                "APPLY": [{"m": {agg: "sections_instructor"}}]
            }
        }));
    }
}

#[test]
fn test_count_accepts_string_targets() {
    assert!(validate(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept", "instructors"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [{"instructors": {"COUNT": "sections_instructor"}}]
        }
    }))
    .is_ok());
}

#[test]
fn test_unknown_transformations_key_rejected() {
    assert_invalid(json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["sections_dept"]},
        "TRANSFORMATIONS": {
            "GROUP": ["sections_dept"],
            "APPLY": [],
            "HAVING": {}
        }
    }));
}
