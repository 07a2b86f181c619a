//! In-memory `Backend` for exercising the tool handlers without a server.

#![allow(dead_code)]

use pgsql_mcp_server::db::{Backend, Session};
use pgsql_mcp_server::error::{DbError, DbResult};
use pgsql_mcp_server::models::{ColumnInfo, ForeignKeyInfo, IndexInfo, QueryResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Where the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Every catalog lookup fails with a connectivity error.
    Catalog,
    Begin,
    /// The statement is rejected by the server (duplicate column).
    Execute,
    /// The statement is rejected and the rollback fails too.
    ExecuteAndRollback,
    Commit,
    /// The read statement is rejected (missing relation).
    Fetch,
    /// A cell of the result could not be decoded.
    Decode,
}

pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
pub struct MockBackend {
    pub schemas: Vec<String>,
    pub tables: HashMap<String, Vec<String>>,
    pub columns: Vec<ColumnInfo>,
    pub indexes: Vec<IndexInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
    /// One entry per statement of a read query.
    pub query_results: Vec<QueryResult>,
    pub rows_affected: u64,
    pub failure: Option<Failure>,
    pub calls: CallLog,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn catalog<T: Clone>(&self, value: &T) -> DbResult<T> {
        if self.failure == Some(Failure::Catalog) {
            return Err(DbError::connectivity("Connection pool is closed"));
        }
        Ok(value.clone())
    }
}

pub struct MockSession {
    calls: CallLog,
    failure: Option<Failure>,
    rows_affected: u64,
}

impl Session for MockSession {
    async fn execute(&mut self, sql: &str) -> DbResult<u64> {
        self.calls.lock().unwrap().push(format!("execute:{}", sql));
        match self.failure {
            Some(Failure::Execute) | Some(Failure::ExecuteAndRollback) => {
                Err(DbError::from_sql_state(
                    "column \"name\" specified more than once",
                    Some("42701"),
                ))
            }
            _ => Ok(self.rows_affected),
        }
    }

    async fn commit(self) -> DbResult<()> {
        self.calls.lock().unwrap().push("commit".to_string());
        if self.failure == Some(Failure::Commit) {
            return Err(DbError::from_sql_state(
                "could not serialize access due to concurrent update",
                Some("40001"),
            ));
        }
        Ok(())
    }

    async fn rollback(self) -> DbResult<()> {
        self.calls.lock().unwrap().push("rollback".to_string());
        if self.failure == Some(Failure::ExecuteAndRollback) {
            return Err(DbError::connectivity("connection reset by peer"));
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    type Session = MockSession;

    async fn begin(&self) -> DbResult<MockSession> {
        self.record("begin");
        if self.failure == Some(Failure::Begin) {
            return Err(DbError::connectivity(
                "Timed out while waiting for a pooled connection",
            ));
        }
        Ok(MockSession {
            calls: self.calls.clone(),
            failure: self.failure,
            rows_affected: self.rows_affected,
        })
    }

    async fn fetch_all(&self, sql: &str) -> DbResult<Vec<QueryResult>> {
        self.record(format!("fetch:{}", sql));
        match self.failure {
            Some(Failure::Fetch) => Err(DbError::from_sql_state(
                "relation \"missing\" does not exist",
                Some("42P01"),
            )),
            Some(Failure::Decode) => Err(DbError::unknown("Failed to decode column 0")),
            _ => Ok(self.query_results.clone()),
        }
    }

    async fn schema_names(&self) -> DbResult<Vec<String>> {
        self.record("schemas");
        self.catalog(&self.schemas)
    }

    async fn table_names(&self, schema: &str) -> DbResult<Vec<String>> {
        self.record(format!("tables:{}", schema));
        let tables = self.tables.get(schema).cloned().unwrap_or_default();
        self.catalog(&tables)
    }

    async fn columns(&self, table: &str, schema: &str) -> DbResult<Vec<ColumnInfo>> {
        self.record(format!("columns:{}.{}", schema, table));
        self.catalog(&self.columns)
    }

    async fn indexes(&self, table: &str, schema: &str) -> DbResult<Vec<IndexInfo>> {
        self.record(format!("indexes:{}.{}", schema, table));
        self.catalog(&self.indexes)
    }

    async fn foreign_keys(&self, table: &str, schema: &str) -> DbResult<Vec<ForeignKeyInfo>> {
        self.record(format!("foreign_keys:{}.{}", schema, table));
        self.catalog(&self.foreign_keys)
    }
}
