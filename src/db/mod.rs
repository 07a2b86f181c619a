//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Connection pool management
//! - Raw statement execution
//! - Schema introspection
//! - Type mappings
//!
//! The tool layer is written against the [`Backend`] and [`Session`] traits so
//! that it can be exercised without a live server. [`ConnectionManager`] is the
//! PostgreSQL implementation.

pub mod executor;
pub mod pool;
pub mod schema;
pub mod types;

pub use executor::QueryExecutor;
pub use pool::{ConnectionManager, PgSession};
pub use schema::SchemaInspector;

use crate::error::DbResult;
use crate::models::{ColumnInfo, ForeignKeyInfo, IndexInfo, QueryResult};
use std::future::Future;

/// A transaction borrowed from the shared handle.
///
/// Dropping a session without calling `commit` or `rollback` discards any
/// work done in it.
pub trait Session: Send {
    /// Execute raw SQL and return the number of rows affected.
    fn execute(&mut self, sql: &str) -> impl Future<Output = DbResult<u64>> + Send;

    fn commit(self) -> impl Future<Output = DbResult<()>> + Send;

    fn rollback(self) -> impl Future<Output = DbResult<()>> + Send;
}

/// Operations every tool needs from the shared database handle.
pub trait Backend: Send + Sync {
    type Session: Session;

    /// Start a new transaction on its own pooled connection.
    fn begin(&self) -> impl Future<Output = DbResult<Self::Session>> + Send;

    /// Run read statements and collect every row, one result per statement.
    fn fetch_all(&self, sql: &str) -> impl Future<Output = DbResult<Vec<QueryResult>>> + Send;

    fn schema_names(&self) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    fn table_names(&self, schema: &str) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    fn columns(
        &self,
        table: &str,
        schema: &str,
    ) -> impl Future<Output = DbResult<Vec<ColumnInfo>>> + Send;

    fn indexes(
        &self,
        table: &str,
        schema: &str,
    ) -> impl Future<Output = DbResult<Vec<IndexInfo>>> + Send;

    fn foreign_keys(
        &self,
        table: &str,
        schema: &str,
    ) -> impl Future<Output = DbResult<Vec<ForeignKeyInfo>>> + Send;
}
