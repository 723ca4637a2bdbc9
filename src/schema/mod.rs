//! Schema registry for insightdb
//!
//! The fixed set of field names valid per record kind, and which are numeric
//! vs. string. Pure lookup tables plus query-key parsing; no I/O and no
//! mutable state.
//!
//! # Design Principles
//!
//! - Schemas are closed: no dynamic fields
//! - Field identity is case-sensitive
//! - The two kinds' field sets are disjoint, so a field name resolves to
//!   exactly one kind

mod fields;
mod key;

pub use fields::{field_type, resolve_field, DatasetKind, FieldType};
pub use key::QueryKey;
