//! Raw SQL execution tools.
//!
//! This module implements `run_dql_query`, `run_ddl_query`, `run_dml_query`
//! and `run_dcl_query`. The statement class comes from the tool that was
//! called; the SQL text is passed to the server untouched.
//!
//! Read queries run in a transaction that is never committed. Every other
//! class runs in its own transaction that is committed on success and
//! rolled back if the statement fails.

use crate::db::{Backend, Session};
use crate::error::DbResult;
use crate::models::{QueryResult, StatementKind};
use crate::tools::envelope::statement_error;
use crate::tools::format::{format_table, row_count_footer, row_count_text};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the run_*_query tools.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RawSqlInput {
    /// SQL text to execute
    #[serde(alias = "raw_sql_query")]
    pub raw_sql: String,
}

pub struct StatementToolHandler<B> {
    backend: Arc<B>,
}

impl<B: Backend> StatementToolHandler<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Run `sql` as a statement of class `kind` and describe the outcome.
    pub async fn run(&self, kind: StatementKind, input: RawSqlInput) -> String {
        info!(statement = %kind, sql_len = input.raw_sql.len(), "Running statement");

        match kind {
            StatementKind::Dql => match self.backend.fetch_all(&input.raw_sql).await {
                Ok(results) => render_results(&results),
                Err(e) => statement_error(kind, &e),
            },
            _ => match self.execute_in_transaction(&input.raw_sql).await {
                Ok(rows_affected) => {
                    info!(statement = %kind, rows_affected, "Statement committed");
                    kind.success_message(rows_affected)
                }
                Err(e) => statement_error(kind, &e),
            },
        }
    }

    async fn execute_in_transaction(&self, sql: &str) -> DbResult<u64> {
        let mut session = self.backend.begin().await?;

        match session.execute(sql).await {
            Ok(rows_affected) => {
                session.commit().await?;
                Ok(rows_affected)
            }
            Err(e) => {
                if let Err(rollback_err) = session.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed statement also failed");
                }
                Err(e)
            }
        }
    }
}

/// One block per statement that produced rows, separated by a blank line.
fn render_results(results: &[QueryResult]) -> String {
    let blocks: Vec<String> = results
        .iter()
        .filter(|r| !r.is_empty())
        .map(render_result)
        .collect();

    if blocks.is_empty() {
        return "Query returned no results.".to_string();
    }
    blocks.join("\n\n")
}

fn render_result(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return format!(
            "Query returned {} with no columns.",
            row_count_text(result.row_count())
        );
    }
    format!(
        "{}{}",
        format_table(&result.columns, &result.rows),
        row_count_footer(result.row_count())
    )
}
