//! Raw statement execution.
//!
//! Caller-supplied SQL is sent as-is over the simple query protocol: no
//! parameters, no prepared statement. This lets multi-statement text and
//! statements that cannot be prepared (e.g. some DDL) run exactly as they
//! would in a console session.

use crate::db::types::{column_names, row_to_cells};
use crate::error::DbResult;
use crate::models::QueryResult;
use futures_util::TryStreamExt;
use sqlx::{Either, Executor, PgConnection, PgPool};
use std::time::Instant;
use tracing::debug;

/// Query executor that handles raw statement execution.
pub struct QueryExecutor;

impl QueryExecutor {
    /// Run read statements and collect every row, one result per statement.
    ///
    /// Multi-statement text yields one `QueryResult` per statement, in order,
    /// including statements that returned no rows. The statements run inside
    /// a transaction that is never committed; the pool rolls it back when the
    /// connection is returned.
    pub async fn fetch_all(pool: &PgPool, sql: &str) -> DbResult<Vec<QueryResult>> {
        let start = Instant::now();
        let mut tx = pool.begin().await?;

        let mut results = Vec::new();
        let mut current = QueryResult::default();
        {
            let mut stream = (&mut *tx).fetch_many(sql);
            while let Some(item) = stream.try_next().await? {
                match item {
                    Either::Left(_done) => results.push(std::mem::take(&mut current)),
                    Either::Right(row) => {
                        if current.rows.is_empty() {
                            current.columns = column_names(&row);
                        }
                        current.rows.push(row_to_cells(&row));
                    }
                }
            }
        }
        drop(tx);

        // Rows not followed by a completion message still belong to a statement
        if !current.rows.is_empty() {
            results.push(current);
        }

        debug!(
            statements = results.len(),
            rows = results.iter().map(QueryResult::row_count).sum::<usize>(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Fetched query rows"
        );
        Ok(results)
    }

    /// Execute a statement on an open connection and return affected rows.
    pub async fn execute(conn: &mut PgConnection, sql: &str) -> DbResult<u64> {
        let start = Instant::now();
        let done = conn.execute(sql).await?;

        debug!(
            rows_affected = done.rows_affected(),
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Executed statement"
        );
        Ok(done.rows_affected())
    }
}
