//! Stdio transport for the MCP server.
//!
//! JSON-RPC messages are read from stdin and responses written to stdout.
//! Logging goes to stderr so it never interleaves with the protocol stream.

use crate::db::ConnectionManager;
use crate::error::{DbError, DbResult};
use crate::mcp::DbService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

pub struct StdioTransport {
    connection_manager: Arc<ConnectionManager>,
}

impl StdioTransport {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = DbService::new(self.connection_manager.clone());

        let running_service = match service.serve(stdio()).await {
            Ok(running) => running,
            Err(e) => {
                self.connection_manager.close().await;
                return Err(DbError::unknown(format!(
                    "Failed to start stdio transport: {}",
                    e
                )));
            }
        };

        let mut outcome = Ok(());
        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(quit_reason) => info!(reason = ?quit_reason, "Stdio transport completed"),
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        outcome = Err(DbError::unknown(format!("Stdio transport error: {}", e)));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received (send again to force exit)");
                true
            }
        };

        if shutdown_requested {
            tokio::spawn(async {
                wait_for_signal().await;
                warn!("Received second signal, forcing immediate exit");
                std::process::exit(1);
            });
        }

        self.connection_manager.close().await;

        if shutdown_requested {
            // A blocked stdin read cannot be cancelled, so leave explicitly.
            info!("Exiting process");
            std::process::exit(0);
        }

        outcome
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
