//! Data models for the PostgreSQL MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod query;
pub mod schema;

// Re-export commonly used types
pub use query::{QueryResult, StatementKind};
pub use schema::{ColumnInfo, ForeignKeyInfo, IndexInfo};
