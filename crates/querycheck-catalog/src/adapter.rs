//! Store adapter trait for introspection and execution

use querycheck_core::TableSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur when introspecting the store
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A statement the store refused to run
///
/// The message is the store's own text, unmodified, so it can be classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rows returned by a statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutput {
    /// Column names, in select order
    pub columns: Vec<String>,

    /// Row values, one entry per column
    pub rows: Vec<Vec<serde_json::Value>>,

    /// Rows changed by a statement that returns no columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<usize>,
}

impl QueryOutput {
    /// Empty result with the given columns
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            rows_affected: None,
        }
    }

    /// Result of a statement that changed rows
    pub fn affected(count: usize) -> Self {
        Self {
            rows_affected: Some(count),
            ..Self::default()
        }
    }

    /// Add a row
    pub fn with_row(mut self, row: Vec<serde_json::Value>) -> Self {
        self.rows.push(row);
        self
    }

    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.rows_affected.unwrap_or(0) == 0
    }
}

impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(count) = self.rows_affected {
            return write!(f, "{} row(s) affected", count);
        }

        write!(f, "{}", self.columns.join(" | "))?;
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|value| match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            write!(f, "\n{}", cells.join(" | "))?;
        }
        Ok(())
    }
}

/// Trait for store adapters
#[async_trait::async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Get the adapter name (e.g., "SQLite")
    fn name(&self) -> &'static str;

    /// Names of the user tables currently in the store
    async fn list_tables(&self) -> Result<Vec<String>, FetchError>;

    /// Columns, foreign keys and indexes of one table
    async fn fetch_table(&self, table: &str) -> Result<TableSchema, FetchError>;

    /// Run a statement
    ///
    /// The statement is passed through as-is; checking it beforehand is the
    /// caller's job.
    async fn execute(&self, sql: &str) -> Result<QueryOutput, ExecutionError>;

    /// Test the connection to the store
    async fn test_connection(&self) -> Result<(), FetchError>;
}
