//! PostgreSQL type mappings.
//!
//! This module converts result cells into `serde_json::Value` so that the
//! formatter can align numbers and render NULLs uniformly.
//!
//! # Architecture
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. A decoder per category extracts the value
//!
//! Raw statements run over the simple query protocol, so every cell arrives
//! in PostgreSQL's text representation. Anything that does not fit a typed
//! category is rendered from that text unchanged, which keeps dates,
//! intervals, arrays and other types displayed the way `psql` shows them.

use serde_json::Value as JsonValue;
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo};

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Json,
    Other,
}

/// Classify a PostgreSQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Array types are reported as e.g. "INT4[]" and render as text
    if lower.ends_with("[]") {
        return TypeCategory::Other;
    }

    if lower.contains("numeric") || lower.contains("decimal") {
        return TypeCategory::Decimal;
    }

    if matches!(lower.as_str(), "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint")
        || lower.contains("serial")
    {
        return TypeCategory::Integer;
    }

    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    if matches!(lower.as_str(), "float4" | "float8" | "real" | "double precision") {
        return TypeCategory::Float;
    }

    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    TypeCategory::Other
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Wrapper type for raw NUMERIC values as strings.
/// This preserves the exact database representation.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

// =============================================================================
// Row Conversion
// =============================================================================

/// Column names of a row, in result order.
pub fn column_names(row: &PgRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Decode every cell of a row, in result order.
pub fn row_to_cells(row: &PgRow) -> Vec<JsonValue> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| decode_column(row, idx, categorize_type(col.type_info().name())))
        .collect()
}

fn decode_column(row: &PgRow, idx: usize, category: TypeCategory) -> JsonValue {
    let typed = match category {
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => decode_boolean(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Json => decode_json(row, idx),
        TypeCategory::Other => None,
    };

    typed.unwrap_or_else(|| decode_text(row, idx))
}

fn decode_decimal(row: &PgRow, idx: usize) -> Option<JsonValue> {
    match row.try_get::<Option<RawDecimal>, _>(idx) {
        Ok(Some(v)) => Some(JsonValue::String(v.0)),
        Ok(None) => Some(JsonValue::Null),
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to decode NUMERIC, falling back to text");
            None
        }
    }
}

fn decode_integer(row: &PgRow, idx: usize) -> Option<JsonValue> {
    if let Ok(None) = row.try_get::<Option<i64>, _>(idx) {
        return Some(JsonValue::Null);
    }
    if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
        return Some(JsonValue::Number(v.into()));
    }
    if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
        return Some(JsonValue::Number(v.into()));
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return Some(JsonValue::Number(v.into()));
    }
    None
}

fn decode_boolean(row: &PgRow, idx: usize) -> Option<JsonValue> {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .map(|v| v.map(JsonValue::Bool).unwrap_or(JsonValue::Null))
}

fn decode_float(row: &PgRow, idx: usize) -> Option<JsonValue> {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return finite_number(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return finite_number(v as f64);
    }
    None
}

/// `Infinity`, `-Infinity` and `NaN` have no JSON number form; they are left
/// to the text decoder so they print as the server spells them.
fn finite_number(v: f64) -> Option<JsonValue> {
    serde_json::Number::from_f64(v).map(JsonValue::Number)
}

fn decode_json(row: &PgRow, idx: usize) -> Option<JsonValue> {
    row.try_get::<Option<JsonValue>, _>(idx)
        .ok()
        .map(|v| v.unwrap_or(JsonValue::Null))
}

/// Render the cell from its wire text without a type check.
fn decode_text(row: &PgRow, idx: usize) -> JsonValue {
    match row.try_get_unchecked::<Option<String>, _>(idx) {
        Ok(Some(s)) => JsonValue::String(s),
        Ok(None) => JsonValue::Null,
        Err(e) => {
            tracing::error!(column = idx, error = ?e, "Failed to decode column as text");
            JsonValue::Null
        }
    }
}
