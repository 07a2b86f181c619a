//! Error types for the PostgreSQL MCP Server.
//!
//! Errors are categorised with `thiserror` so internal code can match on
//! structure, while the tool boundary only ever sees the rendered detail
//! text (see `tools::envelope`). The `Display` output of every variant is the
//! underlying failure message with no category prefix.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Network, TLS, protocol or pool failures, and server-side connection errors.
    #[error("{message}")]
    Connectivity {
        message: String,
        sql_state: Option<String>,
    },

    /// Unknown schema, table, column, type or function.
    #[error("{message}")]
    NotFound {
        message: String,
        sql_state: Option<String>,
    },

    /// Integrity constraint violations (SQLSTATE class 23).
    #[error("{message}")]
    Constraint {
        message: String,
        sql_state: Option<String>,
    },

    /// Syntax errors and invalid object definitions.
    #[error("{message}")]
    Syntax {
        message: String,
        sql_state: Option<String>,
    },

    /// Insufficient privilege or failed authorization.
    #[error("{message}")]
    Permission {
        message: String,
        sql_state: Option<String>,
    },

    /// Any other error reported by the database server.
    #[error("{message}")]
    Database {
        message: String,
        sql_state: Option<String>,
    },

    /// Invalid connection string or server configuration.
    #[error("{message}")]
    Configuration { message: String },

    /// Failures that did not come from the database layer.
    #[error("{message}")]
    Unknown { message: String },
}

impl DbError {
    /// Create a connectivity error without a SQL state.
    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity {
            message: message.into(),
            sql_state: None,
        }
    }

    /// Create a not-found error without a SQL state.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            sql_state: None,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an error for a failure outside the database layer.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Classify a server-reported error by its SQLSTATE code.
    pub fn from_sql_state(message: impl Into<String>, code: Option<&str>) -> Self {
        let message = message.into();
        let sql_state = code.map(str::to_string);
        let Some(code) = code else {
            return Self::Database { message, sql_state };
        };

        match code {
            "42P01" | "42703" | "42704" | "3F000" | "3D000" | "42883" => {
                Self::NotFound { message, sql_state }
            }
            "42501" => Self::Permission { message, sql_state },
            "57P01" | "57P02" | "57P03" => Self::Connectivity { message, sql_state },
            _ if code.starts_with("23") => Self::Constraint { message, sql_state },
            _ if code.starts_with("08") => Self::Connectivity { message, sql_state },
            _ if code.starts_with("28") => Self::Permission { message, sql_state },
            _ if code.starts_with("42") => Self::Syntax { message, sql_state },
            _ => Self::Database { message, sql_state },
        }
    }

    /// The SQLSTATE reported by the server, if any.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Connectivity { sql_state, .. }
            | Self::NotFound { sql_state, .. }
            | Self::Constraint { sql_state, .. }
            | Self::Syntax { sql_state, .. }
            | Self::Permission { sql_state, .. }
            | Self::Database { sql_state, .. } => sql_state.as_deref(),
            Self::Configuration { .. } | Self::Unknown { .. } => None,
        }
    }

    /// Short category name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connectivity { .. } => "connectivity",
            Self::NotFound { .. } => "not_found",
            Self::Constraint { .. } => "constraint",
            Self::Syntax { .. } => "syntax",
            Self::Permission { .. } => "permission",
            Self::Database { .. } => "database",
            Self::Configuration { .. } => "configuration",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// True for failures raised by the database layer (driver, pool or server).
    ///
    /// Statement tools use this to choose between the "Error occurred" and
    /// "Unexpected error occurred" message templates.
    pub fn is_database_error(&self) -> bool {
        !matches!(self, Self::Unknown { .. })
    }
}

/// Convert sqlx errors to DbError.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DbError::configuration(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                DbError::from_sql_state(db_err.message(), db_err.code().as_deref())
            }
            sqlx::Error::PoolTimedOut => {
                DbError::connectivity("Timed out while waiting for a pooled connection")
            }
            sqlx::Error::PoolClosed => DbError::connectivity("Connection pool is closed"),
            sqlx::Error::Io(io_err) => DbError::connectivity(format!("I/O error: {}", io_err)),
            sqlx::Error::Tls(tls_err) => DbError::connectivity(format!("TLS error: {}", tls_err)),
            sqlx::Error::Protocol(msg) => DbError::connectivity(format!("Protocol error: {}", msg)),
            sqlx::Error::WorkerCrashed => DbError::connectivity("Database worker crashed"),
            sqlx::Error::TypeNotFound { type_name } => {
                DbError::not_found(format!("Type not found: {}", type_name))
            }
            sqlx::Error::ColumnNotFound(col) => {
                DbError::unknown(format!("Column not found in result: {}", col))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DbError::unknown(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::unknown(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => DbError::unknown(format!("Decode error: {}", source)),
            sqlx::Error::RowNotFound => DbError::unknown("No rows returned"),
            _ => DbError::unknown(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;
