//! MCP tool implementations.
//!
//! This module contains the database tool handlers:
//! - `schema`: catalog introspection (schemas, tables, columns, indexes, foreign keys)
//! - `statement`: raw DQL/DDL/DML/DCL execution
//! - `format`: text table rendering shared by both
//! - `envelope`: error text returned to clients

pub mod envelope;
pub mod format;
pub mod schema;
pub mod statement;

pub use schema::{GetTablesInput, SchemaToolHandler, TableInput};
pub use statement::{RawSqlInput, StatementToolHandler};
