//! Query-related data models.
//!
//! This module defines the statement classes routed to the execution tools
//! and the result shape returned by read queries.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// SQL statement class, chosen by the tool endpoint the caller invoked.
///
/// The statement text itself is never inspected to confirm the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// SELECT, SHOW, EXPLAIN, ...
    Dql,
    /// CREATE, ALTER, DROP, ...
    Ddl,
    /// INSERT, UPDATE, DELETE, ...
    Dml,
    /// GRANT, REVOKE, ...
    Dcl,
}

impl StatementKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dql => "DQL",
            Self::Ddl => "DDL",
            Self::Dml => "DML",
            Self::Dcl => "DCL",
        }
    }

    /// Success text for a committed statement of this class.
    pub fn success_message(self, rows_affected: u64) -> String {
        match self {
            Self::Dml => format!(
                "DML query executed successfully. Affected rows: {}",
                rows_affected
            ),
            other => format!("{} query executed successfully.", other.label()),
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows returned by a read query.
///
/// Columns and cells keep the order reported by the engine; duplicate
/// column names are preserved.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
