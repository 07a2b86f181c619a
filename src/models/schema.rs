//! Schema-related data models.
//!
//! This module defines the descriptors produced by catalog introspection.
//! They are built fresh for every tool call and discarded once formatted.

use serde::Serialize;

/// A column of a table as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type rendered as text, e.g. `character varying(64)`.
    pub data_type: String,
    pub nullable: bool,
    /// Default expression, e.g. `nextval('users_id_seq'::regclass)`.
    pub default: Option<String>,
    /// Identity column or sequence-backed default.
    pub autoincrement: bool,
    pub comment: Option<String>,
}

impl ColumnInfo {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            default: None,
            autoincrement: false,
            comment: None,
        }
    }

    /// Set the default expression.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark the column as auto-incrementing.
    pub fn with_autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = autoincrement;
        self
    }

    /// Set the column comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A secondary index on a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexInfo {
    pub name: String,
    /// Indexed columns in key order.
    pub column_names: Vec<String>,
    pub unique: bool,
}

impl IndexInfo {
    pub fn new(name: impl Into<String>, column_names: Vec<String>, unique: bool) -> Self {
        Self {
            name: name.into(),
            column_names,
            unique,
        }
    }
}

/// A foreign key constraint declared on a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyInfo {
    pub name: String,
    /// Local columns, in constraint key order.
    pub constrained_columns: Vec<String>,
    pub referred_schema: String,
    pub referred_table: String,
    /// Referenced columns, positionally paired with `constrained_columns`.
    pub referred_columns: Vec<String>,
}

impl ForeignKeyInfo {
    /// Create a new foreign key descriptor.
    pub fn new(
        name: impl Into<String>,
        constrained_columns: Vec<String>,
        referred_schema: impl Into<String>,
        referred_table: impl Into<String>,
        referred_columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            constrained_columns,
            referred_schema: referred_schema.into(),
            referred_table: referred_table.into(),
            referred_columns,
        }
    }
}
