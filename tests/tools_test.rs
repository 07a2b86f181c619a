//! Tool handler tests against an in-memory backend.

mod common;

use common::{Failure, MockBackend};
use pgsql_mcp_server::models::{
    ColumnInfo, ForeignKeyInfo, IndexInfo, QueryResult, StatementKind,
};
use pgsql_mcp_server::tools::schema::{GetTablesInput, SchemaToolHandler, TableInput};
use pgsql_mcp_server::tools::statement::{RawSqlInput, StatementToolHandler};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn table_input(table: &str, schema: Option<&str>) -> TableInput {
    TableInput {
        table: table.to_string(),
        schema_name: schema.map(str::to_string),
    }
}

fn sql(text: &str) -> RawSqlInput {
    RawSqlInput {
        raw_sql: text.to_string(),
    }
}

// =============================================================================
// Introspection
// =============================================================================

#[tokio::test]
async fn test_schema_names_lists_every_schema_once() {
    let backend = MockBackend {
        schemas: vec![
            "information_schema".to_string(),
            "public".to_string(),
            "sales".to_string(),
        ],
        ..MockBackend::new()
    };
    let handler = SchemaToolHandler::new(Arc::new(backend));

    let out = handler.get_schema_names().await;

    assert!(out.starts_with("All schemas:\n"));
    for name in ["information_schema", "public", "sales"] {
        assert_eq!(out.matches(&format!("| {} ", name)).count(), 1, "{}", out);
    }
}

#[tokio::test]
async fn test_schema_names_empty() {
    let handler = SchemaToolHandler::new(Arc::new(MockBackend::new()));
    assert_eq!(handler.get_schema_names().await, "No schemas found.");
}

#[tokio::test]
async fn test_get_tables_defaults_to_public() {
    let mut tables = HashMap::new();
    tables.insert(
        "public".to_string(),
        vec!["orders".to_string(), "users".to_string()],
    );
    let backend = Arc::new(MockBackend {
        tables,
        ..MockBackend::new()
    });
    let handler = SchemaToolHandler::new(backend.clone());

    let out = handler.get_tables(GetTablesInput::default()).await;
    assert!(out.starts_with("Tables in schema 'public':\n"));
    assert!(out.contains("| orders "));
    assert!(out.contains("| users "));

    let out = handler
        .get_tables(GetTablesInput {
            schema_name: Some(String::new()),
        })
        .await;
    assert!(out.starts_with("Tables in schema 'public':\n"));

    assert_eq!(backend.calls(), vec!["tables:public", "tables:public"]);
}

#[tokio::test]
async fn test_get_tables_in_empty_schema() {
    let handler = SchemaToolHandler::new(Arc::new(MockBackend::new()));

    let out = handler
        .get_tables(GetTablesInput {
            schema_name: Some("nowhere".to_string()),
        })
        .await;

    assert_eq!(out, "No tables found in schema nowhere.");
}

#[tokio::test]
async fn test_get_columns_one_row_per_column() {
    let backend = Arc::new(MockBackend {
        columns: vec![
            ColumnInfo::new("id", "integer", false)
                .with_default("nextval('users_id_seq'::regclass)")
                .with_autoincrement(true),
            ColumnInfo::new("email", "character varying(255)", false),
            ColumnInfo::new("bio", "text", true),
        ],
        ..MockBackend::new()
    });
    let handler = SchemaToolHandler::new(backend.clone());

    let out = handler.get_columns(table_input("users", Some("app"))).await;

    assert!(out.starts_with("Columns in table 'app.users':\n"));
    // title + 3 separators + header + one line per column
    assert_eq!(out.lines().count(), 1 + 3 + 1 + 3);
    assert!(out.contains("character varying(255)"));
    assert_eq!(backend.calls(), vec!["columns:app.users"]);
}

#[tokio::test]
async fn test_get_columns_missing_table() {
    let handler = SchemaToolHandler::new(Arc::new(MockBackend::new()));
    assert_eq!(
        handler.get_columns(table_input("ghost", None)).await,
        "No columns found in table."
    );
}

#[tokio::test]
async fn test_get_indexes() {
    let backend = MockBackend {
        indexes: vec![IndexInfo::new(
            "users_email_key",
            vec!["email".to_string()],
            true,
        )],
        ..MockBackend::new()
    };
    let handler = SchemaToolHandler::new(Arc::new(backend));

    let out = handler.get_indexes(table_input("users", None)).await;
    assert!(out.starts_with("Indexes in table 'public.users':\n"));
    assert!(out.contains("users_email_key"));
    assert!(out.contains("| true "));

    let empty = SchemaToolHandler::new(Arc::new(MockBackend::new()));
    assert_eq!(
        empty.get_indexes(table_input("users", None)).await,
        "No indexes found in table."
    );
}

#[tokio::test]
async fn test_get_foreign_keys() {
    let backend = MockBackend {
        foreign_keys: vec![ForeignKeyInfo::new(
            "orders_user_id_fkey",
            vec!["user_id".to_string()],
            "public",
            "users",
            vec!["id".to_string()],
        )],
        ..MockBackend::new()
    };
    let handler = SchemaToolHandler::new(Arc::new(backend));

    let out = handler.get_foreign_keys(table_input("orders", None)).await;
    assert!(out.starts_with("Foreign keys in table 'public.orders':\n"));
    assert!(out.contains("orders_user_id_fkey"));

    let empty = SchemaToolHandler::new(Arc::new(MockBackend::new()));
    assert_eq!(
        empty.get_foreign_keys(table_input("orders", None)).await,
        "No foreign keys found in table orders."
    );
}

#[tokio::test]
async fn test_introspection_failure_is_returned_as_text() {
    let handler = SchemaToolHandler::new(Arc::new(MockBackend::failing(Failure::Catalog)));
    let expected = "Error occurred while querying table: Connection pool is closed";

    assert_eq!(handler.get_schema_names().await, expected);
    assert_eq!(handler.get_tables(GetTablesInput::default()).await, expected);
    assert_eq!(handler.get_columns(table_input("t", None)).await, expected);
    assert_eq!(handler.get_indexes(table_input("t", None)).await, expected);
    assert_eq!(handler.get_foreign_keys(table_input("t", None)).await, expected);
}

// =============================================================================
// Statements
// =============================================================================

#[tokio::test]
async fn test_dql_renders_rows_with_footer() {
    let backend = Arc::new(MockBackend {
        query_results: vec![QueryResult::new(
            vec!["id".to_string(), "name".to_string()],
            vec![vec![json!(1), json!("Alice")]],
        )],
        ..MockBackend::new()
    });
    let handler = StatementToolHandler::new(backend.clone());

    let out = handler
        .run(StatementKind::Dql, sql("SELECT id, name FROM users"))
        .await;

    assert!(out.contains("| id | name  |"));
    assert!(out.contains("|  1 | Alice |"));
    assert!(out.ends_with("1 row in set"));
    // never begins a write transaction
    assert_eq!(backend.calls(), vec!["fetch:SELECT id, name FROM users"]);
}

#[tokio::test]
async fn test_dql_multiple_statements_keep_their_own_columns() {
    let backend = Arc::new(MockBackend {
        query_results: vec![
            QueryResult::new(vec!["a".to_string()], vec![vec![json!(1)]]),
            QueryResult::new(
                vec!["b".to_string(), "c".to_string()],
                vec![vec![json!("x"), json!(2)]],
            ),
        ],
        ..MockBackend::new()
    });
    let handler = StatementToolHandler::new(backend);

    let out = handler
        .run(StatementKind::Dql, sql("SELECT 1 AS a; SELECT 'x' AS b, 2 AS c"))
        .await;

    assert!(out.contains("| a |\n"), "{}", out);
    assert!(out.contains("| b | c |\n"), "{}", out);
    assert!(out.contains("| x | 2 |\n"), "{}", out);
    assert_eq!(out.matches("1 row in set").count(), 2, "{}", out);
}

#[tokio::test]
async fn test_dql_zero_rows() {
    let handler = StatementToolHandler::new(Arc::new(MockBackend::new()));
    assert_eq!(
        handler
            .run(StatementKind::Dql, sql("SELECT * FROM t WHERE false"))
            .await,
        "Query returned no results."
    );
}

#[tokio::test]
async fn test_dql_database_error() {
    let handler = StatementToolHandler::new(Arc::new(MockBackend::failing(Failure::Fetch)));
    assert_eq!(
        handler
            .run(StatementKind::Dql, sql("SELECT * FROM missing"))
            .await,
        "Error occurred while executing DQL query: relation \"missing\" does not exist"
    );
}

#[tokio::test]
async fn test_dql_unexpected_error() {
    let handler = StatementToolHandler::new(Arc::new(MockBackend::failing(Failure::Decode)));
    assert_eq!(
        handler.run(StatementKind::Dql, sql("SELECT 1")).await,
        "Unexpected error occurred while executing DQL query: Failed to decode column 0"
    );
}

#[tokio::test]
async fn test_ddl_commits_on_success() {
    let backend = Arc::new(MockBackend::new());
    let handler = StatementToolHandler::new(backend.clone());

    let out = handler
        .run(StatementKind::Ddl, sql("CREATE TABLE t (id int)"))
        .await;

    assert_eq!(out, "DDL query executed successfully.");
    assert_eq!(
        backend.calls(),
        vec!["begin", "execute:CREATE TABLE t (id int)", "commit"]
    );
}

#[tokio::test]
async fn test_dml_reports_affected_rows() {
    let backend = Arc::new(MockBackend {
        rows_affected: 3,
        ..MockBackend::new()
    });
    let handler = StatementToolHandler::new(backend);

    assert_eq!(
        handler
            .run(StatementKind::Dml, sql("UPDATE t SET x = 1"))
            .await,
        "DML query executed successfully. Affected rows: 3"
    );
}

#[tokio::test]
async fn test_dcl_success() {
    let handler = StatementToolHandler::new(Arc::new(MockBackend::new()));
    assert_eq!(
        handler
            .run(StatementKind::Dcl, sql("GRANT SELECT ON t TO reader"))
            .await,
        "DCL query executed successfully."
    );
}

#[tokio::test]
async fn test_failed_statement_rolls_back() {
    let backend = Arc::new(MockBackend::failing(Failure::Execute));
    let handler = StatementToolHandler::new(backend.clone());

    let out = handler
        .run(
            StatementKind::Ddl,
            sql("CREATE TABLE t (name text, name text)"),
        )
        .await;

    assert_eq!(
        out,
        "Error occurred while executing DDL query: column \"name\" specified more than once"
    );
    let calls = backend.calls();
    assert_eq!(calls.last().map(String::as_str), Some("rollback"));
    assert!(!calls.iter().any(|c| c == "commit"));
}

#[tokio::test]
async fn test_rollback_failure_keeps_original_error() {
    let backend = Arc::new(MockBackend::failing(Failure::ExecuteAndRollback));
    let handler = StatementToolHandler::new(backend.clone());

    let out = handler
        .run(StatementKind::Dml, sql("INSERT INTO t VALUES (1)"))
        .await;

    assert!(out.contains("specified more than once"), "{}", out);
    assert!(!out.contains("connection reset"));
    assert!(backend.calls().iter().any(|c| c == "rollback"));
}

#[tokio::test]
async fn test_commit_failure_is_reported() {
    let backend = Arc::new(MockBackend::failing(Failure::Commit));
    let handler = StatementToolHandler::new(backend.clone());

    let out = handler
        .run(StatementKind::Dml, sql("DELETE FROM t"))
        .await;

    assert_eq!(
        out,
        "Error occurred while executing DML query: could not serialize access due to concurrent update"
    );
    assert!(!backend.calls().iter().any(|c| c == "rollback"));
}

#[tokio::test]
async fn test_begin_failure_is_reported() {
    let backend = Arc::new(MockBackend::failing(Failure::Begin));
    let handler = StatementToolHandler::new(backend.clone());

    let out = handler
        .run(StatementKind::Dcl, sql("REVOKE ALL ON t FROM reader"))
        .await;

    assert_eq!(
        out,
        "Error occurred while executing DCL query: Timed out while waiting for a pooled connection"
    );
    assert_eq!(backend.calls(), vec!["begin"]);
}

#[test]
fn test_raw_sql_query_alias_accepted() {
    let input: RawSqlInput =
        serde_json::from_value(json!({ "raw_sql_query": "SELECT 1" })).unwrap();
    assert_eq!(input.raw_sql, "SELECT 1");
}
