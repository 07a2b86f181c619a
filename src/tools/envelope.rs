//! Error text returned to MCP clients.
//!
//! Tool calls never fail at the protocol level for database problems. The
//! failure is logged and turned into one of these strings instead.

use crate::error::DbError;
use crate::models::StatementKind;
use tracing::warn;

/// Text for a failed catalog lookup.
pub fn introspection_error(err: &DbError) -> String {
    warn!(kind = err.kind(), sql_state = ?err.sql_state(), error = %err, "Introspection failed");
    format!("Error occurred while querying table: {}", err)
}

/// Text for a failed statement of the given class.
pub fn statement_error(kind: StatementKind, err: &DbError) -> String {
    warn!(
        statement = %kind,
        kind = err.kind(),
        sql_state = ?err.sql_state(),
        error = %err,
        "Statement failed"
    );
    if err.is_database_error() {
        format!("Error occurred while executing {} query: {}", kind, err)
    } else {
        format!(
            "Unexpected error occurred while executing {} query: {}",
            kind, err
        )
    }
}
