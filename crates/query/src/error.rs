//! Query error types

/// Errors that can occur while loading tables or executing queries
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Input file for a table is missing
    #[error("table '{table}' not found: {path}")]
    TableNotFound {
        /// Logical table name
        table: String,
        /// Path that was expected to hold it
        path: String,
    },

    /// Required column absent from a loaded table
    #[error("table '{table}' is missing column '{column}'")]
    MissingColumn {
        /// Logical table name
        table: String,
        /// Column name
        column: String,
    },

    /// Query execution failed
    #[error("query execution failed: {0}")]
    Execution(String),

    /// Invalid SQL (only SELECT/WITH allowed)
    #[error("invalid SQL: {0}")]
    InvalidSql(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error
    #[error("polars error: {0}")]
    Polars(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl QueryError {
    /// Create a MissingColumn error
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl From<polars::error::PolarsError> for QueryError {
    fn from(err: polars::error::PolarsError) -> Self {
        QueryError::Polars(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Serialization(err.to_string())
    }
}
