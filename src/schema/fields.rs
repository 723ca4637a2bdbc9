//! Field tables for the two record kinds.
//!
//! The schemas are closed: a record of a given kind exposes exactly these
//! fields, no dynamic additions. Field identity is case-sensitive. The two
//! kinds' field sets are disjoint, so a bare field name determines both its
//! kind and its type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of records a dataset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Academic course sections
    Sections,
    /// Campus rooms
    Rooms,
}

impl DatasetKind {
    /// Returns the lowercase name used on the wire and in dataset files
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Sections => "sections",
            DatasetKind::Rooms => "rooms",
        }
    }

    /// Parses the lowercase wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sections" => Some(DatasetKind::Sections),
            "rooms" => Some(DatasetKind::Rooms),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON number
    Numeric,
    /// JSON string
    String,
}

impl FieldType {
    /// Returns true for numeric fields
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Numeric)
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Numeric => "numeric",
            FieldType::String => "string",
        }
    }
}

const SECTIONS_STRING_FIELDS: &[&str] = &["dept", "id", "instructor", "title", "uuid"];
const SECTIONS_NUMERIC_FIELDS: &[&str] = &["avg", "pass", "fail", "audit", "year"];

const ROOMS_STRING_FIELDS: &[&str] = &[
    "fullname",
    "shortname",
    "number",
    "name",
    "address",
    "type",
    "furniture",
    "href",
];
const ROOMS_NUMERIC_FIELDS: &[&str] = &["lat", "lon", "seats"];

/// Looks up the type of `field` within one kind's schema
pub fn field_type(kind: DatasetKind, field: &str) -> Option<FieldType> {
    let (strings, numerics) = match kind {
        DatasetKind::Sections => (SECTIONS_STRING_FIELDS, SECTIONS_NUMERIC_FIELDS),
        DatasetKind::Rooms => (ROOMS_STRING_FIELDS, ROOMS_NUMERIC_FIELDS),
    };
    if strings.contains(&field) {
        Some(FieldType::String)
    } else if numerics.contains(&field) {
        Some(FieldType::Numeric)
    } else {
        None
    }
}

/// Resolves a bare field name to its owning kind and type.
///
/// Unambiguous because the Sections and Rooms field sets are disjoint.
pub fn resolve_field(field: &str) -> Option<(DatasetKind, FieldType)> {
    for kind in [DatasetKind::Sections, DatasetKind::Rooms] {
        if let Some(ftype) = field_type(kind, field) {
            return Some((kind, ftype));
        }
    }
    None
}
