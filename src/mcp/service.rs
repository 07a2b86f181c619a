//! MCP service implementation using rmcp.
//!
//! This module defines the DbService struct with all database tools
//! exposed via the MCP protocol using the rmcp framework's macros.
//!
//! Every tool answers with a text result. Database failures are reported in
//! that text rather than as protocol errors so the calling agent can read
//! the server's message and adjust its next statement.

use crate::db::ConnectionManager;
use crate::models::StatementKind;
use crate::tools::schema::{GetTablesInput, SchemaToolHandler, TableInput};
use crate::tools::statement::{RawSqlInput, StatementToolHandler};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DbService {
    /// Shared connection manager for all database operations
    connection_manager: Arc<ConnectionManager>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl DbService {
    /// Create a new DbService instance.
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self {
            connection_manager,
            tool_router: Self::tool_router(),
        }
    }

    fn schema_handler(&self) -> SchemaToolHandler<ConnectionManager> {
        SchemaToolHandler::new(self.connection_manager.clone())
    }

    fn statement_handler(&self) -> StatementToolHandler<ConnectionManager> {
        StatementToolHandler::new(self.connection_manager.clone())
    }
}

fn text_result(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_router]
impl DbService {
    #[tool(description = "List all schema names in the database.")]
    async fn get_schema_names(&self) -> Result<CallToolResult, McpError> {
        text_result(self.schema_handler().get_schema_names().await)
    }

    #[tool(
        description = "List all tables in a schema.\nschema_name defaults to \"public\" when omitted."
    )]
    async fn get_tables(
        &self,
        Parameters(input): Parameters<GetTablesInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.schema_handler().get_tables(input).await)
    }

    #[tool(description = "Alias of get_tables: list all tables in a schema.")]
    async fn get_tables_in_schema(
        &self,
        Parameters(input): Parameters<GetTablesInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.schema_handler().get_tables(input).await)
    }

    #[tool(
        description = "List the columns of a table with type, nullability, default, autoincrement and comment.\nschema_name defaults to \"public\"."
    )]
    async fn get_columns(
        &self,
        Parameters(input): Parameters<TableInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.schema_handler().get_columns(input).await)
    }

    #[tool(
        description = "List the indexes of a table (primary key excluded).\nschema_name defaults to \"public\"."
    )]
    async fn get_indexes(
        &self,
        Parameters(input): Parameters<TableInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.schema_handler().get_indexes(input).await)
    }

    #[tool(
        description = "List the foreign keys declared on a table.\nschema_name defaults to \"public\"."
    )]
    async fn get_foreign_keys(
        &self,
        Parameters(input): Parameters<TableInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.schema_handler().get_foreign_keys(input).await)
    }

    #[tool(
        description = "Run a DQL query (SELECT, SHOW, EXPLAIN) and return the rows as a text table.\nThe query runs in a transaction that is never committed."
    )]
    async fn run_dql_query(
        &self,
        Parameters(input): Parameters<RawSqlInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.statement_handler().run(StatementKind::Dql, input).await)
    }

    #[tool(
        description = "Run a DDL query (CREATE, ALTER, DROP, TRUNCATE).\nCommitted on success, rolled back on failure."
    )]
    async fn run_ddl_query(
        &self,
        Parameters(input): Parameters<RawSqlInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.statement_handler().run(StatementKind::Ddl, input).await)
    }

    #[tool(
        description = "Run a DML query (INSERT, UPDATE, DELETE) and report the affected row count.\nCommitted on success, rolled back on failure."
    )]
    async fn run_dml_query(
        &self,
        Parameters(input): Parameters<RawSqlInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.statement_handler().run(StatementKind::Dml, input).await)
    }

    #[tool(
        description = "Run a DCL query (GRANT, REVOKE).\nCommitted on success, rolled back on failure."
    )]
    async fn run_dcl_query(
        &self,
        Parameters(input): Parameters<RawSqlInput>,
    ) -> Result<CallToolResult, McpError> {
        text_result(self.statement_handler().run(StatementKind::Dcl, input).await)
    }
}

#[tool_handler]
impl ServerHandler for DbService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pgsql-mcp-server".to_owned(),
                title: Some("PostgreSQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for exploring and changing a single PostgreSQL database.\n\
                \n\
                ## Workflow\n\
                1. `get_schema_names` to see the schemas\n\
                2. `get_tables` for a schema (default \"public\")\n\
                3. `get_columns`, `get_indexes`, `get_foreign_keys` for a table\n\
                4. `run_dql_query` to read data\n\
                \n\
                ## Writing\n\
                Pick the tool that matches the statement class: `run_ddl_query` for schema\n\
                changes, `run_dml_query` for data changes, `run_dcl_query` for privileges.\n\
                Each call runs in its own transaction and is committed on success.\n\
                \n\
                ## Errors\n\
                Failures come back as text starting with \"Error occurred\" and carry the\n\
                server's message."
                    .to_string(),
            ),
        }
    }
}
