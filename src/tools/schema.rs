//! Schema introspection tools.
//!
//! This module implements `get_schema_names`, `get_tables`, `get_columns`,
//! `get_indexes` and `get_foreign_keys`. Each returns a title line followed
//! by a text table, a fixed message when the catalog has nothing to report,
//! or an error message when the lookup fails.

use crate::db::Backend;
use crate::models::{ColumnInfo, ForeignKeyInfo, IndexInfo};
use crate::tools::envelope::introspection_error;
use crate::tools::format::{format_name_list, format_table, join_list};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Schema used when the caller does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Input for the get_tables tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GetTablesInput {
    /// Schema to list tables from. Default: "public"
    #[serde(default)]
    pub schema_name: Option<String>,
}

/// Input for the per-table tools (get_columns, get_indexes, get_foreign_keys).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TableInput {
    /// Name of the table
    pub table: String,
    /// Schema containing the table. Default: "public"
    #[serde(default)]
    pub schema_name: Option<String>,
}

/// `None` and empty names fall back to `public`.
pub fn resolve_schema(schema_name: Option<&str>) -> &str {
    match schema_name {
        Some(s) if !s.trim().is_empty() => s,
        _ => DEFAULT_SCHEMA,
    }
}

pub struct SchemaToolHandler<B> {
    backend: Arc<B>,
}

impl<B: Backend> SchemaToolHandler<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn get_schema_names(&self) -> String {
        info!("Listing schemas");
        match self.backend.schema_names().await {
            Ok(names) if names.is_empty() => "No schemas found.".to_string(),
            Ok(names) => format!("All schemas:\n{}", format_name_list("schema_name", &names)),
            Err(e) => introspection_error(&e),
        }
    }

    pub async fn get_tables(&self, input: GetTablesInput) -> String {
        let schema = resolve_schema(input.schema_name.as_deref());
        info!(schema = schema, "Listing tables");

        match self.backend.table_names(schema).await {
            Ok(names) if names.is_empty() => format!("No tables found in schema {}.", schema),
            Ok(names) => format!(
                "Tables in schema '{}':\n{}",
                schema,
                format_name_list("table_name", &names)
            ),
            Err(e) => introspection_error(&e),
        }
    }

    pub async fn get_columns(&self, input: TableInput) -> String {
        let schema = resolve_schema(input.schema_name.as_deref());
        info!(table = %input.table, schema = schema, "Listing columns");

        match self.backend.columns(&input.table, schema).await {
            Ok(columns) if columns.is_empty() => "No columns found in table.".to_string(),
            Ok(columns) => format!(
                "Columns in table '{}.{}':\n{}",
                schema,
                input.table,
                columns_table(&columns)
            ),
            Err(e) => introspection_error(&e),
        }
    }

    pub async fn get_indexes(&self, input: TableInput) -> String {
        let schema = resolve_schema(input.schema_name.as_deref());
        info!(table = %input.table, schema = schema, "Listing indexes");

        match self.backend.indexes(&input.table, schema).await {
            Ok(indexes) if indexes.is_empty() => "No indexes found in table.".to_string(),
            Ok(indexes) => format!(
                "Indexes in table '{}.{}':\n{}",
                schema,
                input.table,
                indexes_table(&indexes)
            ),
            Err(e) => introspection_error(&e),
        }
    }

    pub async fn get_foreign_keys(&self, input: TableInput) -> String {
        let schema = resolve_schema(input.schema_name.as_deref());
        info!(table = %input.table, schema = schema, "Listing foreign keys");

        match self.backend.foreign_keys(&input.table, schema).await {
            Ok(fks) if fks.is_empty() => {
                format!("No foreign keys found in table {}.", input.table)
            }
            Ok(fks) => format!(
                "Foreign keys in table '{}.{}':\n{}",
                schema,
                input.table,
                foreign_keys_table(&fks)
            ),
            Err(e) => introspection_error(&e),
        }
    }
}

fn optional_text(value: &Option<String>) -> JsonValue {
    value
        .as_ref()
        .map(|s| JsonValue::String(s.clone()))
        .unwrap_or(JsonValue::Null)
}

fn columns_table(columns: &[ColumnInfo]) -> String {
    let rows: Vec<Vec<JsonValue>> = columns
        .iter()
        .map(|c| {
            vec![
                JsonValue::String(c.name.clone()),
                JsonValue::String(c.data_type.clone()),
                JsonValue::Bool(c.nullable),
                optional_text(&c.default),
                JsonValue::Bool(c.autoincrement),
                optional_text(&c.comment),
            ]
        })
        .collect();
    format_table(
        &["name", "type", "nullable", "default", "autoincrement", "comment"],
        &rows,
    )
}

fn indexes_table(indexes: &[IndexInfo]) -> String {
    let rows: Vec<Vec<JsonValue>> = indexes
        .iter()
        .map(|i| {
            vec![
                JsonValue::String(i.name.clone()),
                JsonValue::String(join_list(&i.column_names)),
                JsonValue::Bool(i.unique),
            ]
        })
        .collect();
    format_table(&["name", "column_names", "unique"], &rows)
}

fn foreign_keys_table(fks: &[ForeignKeyInfo]) -> String {
    let rows: Vec<Vec<JsonValue>> = fks
        .iter()
        .map(|fk| {
            vec![
                JsonValue::String(fk.name.clone()),
                JsonValue::String(join_list(&fk.constrained_columns)),
                JsonValue::String(fk.referred_schema.clone()),
                JsonValue::String(fk.referred_table.clone()),
                JsonValue::String(join_list(&fk.referred_columns)),
            ]
        })
        .collect();
    format_table(
        &[
            "name",
            "constrained_columns",
            "referred_schema",
            "referred_table",
            "referred_columns",
        ],
        &rows,
    )
}
