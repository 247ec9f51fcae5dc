//! Mock store adapter for testing
//!
//! This adapter returns predefined tables and canned statement results without
//! opening any store. It's useful for:
//! - Unit testing the query tool without a database file
//! - Simulating the store's error messages for remediation tests
//! - Simulating connection failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use querycheck_catalog::{MockAdapter, DatabaseAdapter, QueryOutput};
//! use querycheck_core::{Column, TableSchema};
//!
//! let adapter = MockAdapter::new();
//! adapter.add_table(TableSchema::from_columns("paint", vec![
//!     Column::new("id", "INTEGER"),
//! ])).await;
//! adapter.add_query_error("SELECT * FROM piant", "no such table: piant").await;
//!
//! let tables = adapter.list_tables().await?;
//! ```

use crate::adapter::{DatabaseAdapter, ExecutionError, FetchError, QueryOutput};
use querycheck_core::TableSchema;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock store adapter for testing
///
/// Tables are listed in name order, like a real catalog query. Statements
/// without a canned result return an empty output.
pub struct MockAdapter {
    /// Predefined tables by name
    tables: Arc<RwLock<BTreeMap<String, TableSchema>>>,

    /// Errors to return when describing specific tables
    table_errors: Arc<RwLock<HashMap<String, FetchError>>>,

    /// Canned results by statement text
    results: Arc<RwLock<HashMap<String, QueryOutput>>>,

    /// Canned store error messages by statement text
    query_errors: Arc<RwLock<HashMap<String, String>>>,

    /// Fail connection tests and table listing
    fail_connection: bool,

    /// Name to return from name() method
    adapter_name: &'static str,
}

impl MockAdapter {
    /// Create a new mock adapter with no tables
    pub fn new() -> Self {
        MockAdapterBuilder::new().build()
    }

    /// Add or replace a table
    pub async fn add_table(&self, table: TableSchema) {
        self.tables.write().await.insert(table.name.clone(), table);
    }

    /// Configure an error to be returned when describing a table
    pub async fn add_table_error(&self, table: &str, error: FetchError) {
        self.table_errors.write().await.insert(table.to_string(), error);
    }

    /// Configure the result of a statement
    pub async fn add_query_result(&self, sql: &str, output: QueryOutput) {
        self.results.write().await.insert(sql.to_string(), output);
    }

    /// Configure the store error message for a statement
    pub async fn add_query_error(&self, sql: &str, message: &str) {
        self.query_errors
            .write()
            .await
            .insert(sql.to_string(), message.to_string());
    }

    /// Configure to fail connection tests and table listing
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Set a custom adapter name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockAdapter {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            table_errors: Arc::clone(&self.table_errors),
            results: Arc::clone(&self.results),
            query_errors: Arc::clone(&self.query_errors),
            fail_connection: self.fail_connection,
            adapter_name: self.adapter_name,
        }
    }
}

#[async_trait::async_trait]
impl DatabaseAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        self.adapter_name
    }

    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        if self.fail_connection {
            return Err(FetchError::ConnectionError(
                "Simulated connection failure".to_string(),
            ));
        }

        Ok(self.tables.read().await.keys().cloned().collect())
    }

    async fn fetch_table(&self, table: &str) -> Result<TableSchema, FetchError> {
        // Check for configured errors first
        if let Some(error) = self.table_errors.read().await.get(table) {
            return Err(error.clone());
        }

        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .ok_or_else(|| FetchError::TableNotFound(table.to_string()))
    }

    async fn execute(&self, sql: &str) -> Result<QueryOutput, ExecutionError> {
        if let Some(message) = self.query_errors.read().await.get(sql) {
            return Err(ExecutionError::new(message.clone()));
        }

        Ok(self.results.read().await.get(sql).cloned().unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        if self.fail_connection {
            Err(FetchError::ConnectionError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Builder for creating MockAdapter with tables and canned statements
///
/// # Example
///
/// ```rust,ignore
/// let adapter = MockAdapterBuilder::new()
///     .with_table(TableSchema::new("paint"))
///     .with_table(TableSchema::new("user"))
///     .with_query_error("SELECT * FORM paint", "near \"FORM\": syntax error")
///     .build();
/// ```
pub struct MockAdapterBuilder {
    tables: BTreeMap<String, TableSchema>,
    table_errors: HashMap<String, FetchError>,
    results: HashMap<String, QueryOutput>,
    query_errors: HashMap<String, String>,
    fail_connection: bool,
    adapter_name: &'static str,
}

impl MockAdapterBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
            table_errors: HashMap::new(),
            results: HashMap::new(),
            query_errors: HashMap::new(),
            fail_connection: false,
            adapter_name: "Mock",
        }
    }

    /// Add a table
    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Add an error for describing a specific table
    pub fn with_table_error(mut self, table: &str, error: FetchError) -> Self {
        self.table_errors.insert(table.to_string(), error);
        self
    }

    /// Add a canned statement result
    pub fn with_query_result(mut self, sql: &str, output: QueryOutput) -> Self {
        self.results.insert(sql.to_string(), output);
        self
    }

    /// Add a canned store error for a statement
    pub fn with_query_error(mut self, sql: &str, message: &str) -> Self {
        self.query_errors.insert(sql.to_string(), message.to_string());
        self
    }

    /// Configure connection failure
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Set adapter name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }

    /// Build the MockAdapter
    pub fn build(self) -> MockAdapter {
        MockAdapter {
            tables: Arc::new(RwLock::new(self.tables)),
            table_errors: Arc::new(RwLock::new(self.table_errors)),
            results: Arc::new(RwLock::new(self.results)),
            query_errors: Arc::new(RwLock::new(self.query_errors)),
            fail_connection: self.fail_connection,
            adapter_name: self.adapter_name,
        }
    }
}

impl Default for MockAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querycheck_core::Column;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_adapter_basic() {
        let adapter = MockAdapter::new();

        adapter
            .add_table(TableSchema::from_columns(
                "paint",
                vec![Column::new("id", "INTEGER"), Column::new("str_name", "VARCHAR")],
            ))
            .await;

        let fetched = adapter.fetch_table("paint").await.unwrap();
        assert_eq!(fetched.columns.len(), 2);
        assert_eq!(fetched.columns[0].name, "id");
        assert_eq!(fetched.columns[1].name, "str_name");
    }

    #[tokio::test]
    async fn test_mock_adapter_lists_tables_in_name_order() {
        let adapter = MockAdapterBuilder::new()
            .with_table(TableSchema::new("user"))
            .with_table(TableSchema::new("paint"))
            .build();

        assert_eq!(adapter.list_tables().await.unwrap(), vec!["paint", "user"]);
    }

    #[tokio::test]
    async fn test_mock_adapter_table_not_found() {
        let adapter = MockAdapter::new();

        let result = adapter.fetch_table("nonexistent").await;
        assert!(matches!(result, Err(FetchError::TableNotFound(_))));
    }

    #[tokio::test]
    async fn test_mock_adapter_connection_failure() {
        let adapter = MockAdapter::new().with_connection_failure();

        assert!(matches!(adapter.test_connection().await, Err(FetchError::ConnectionError(_))));
        assert!(matches!(adapter.list_tables().await, Err(FetchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_mock_adapter_custom_table_error() {
        let adapter = MockAdapter::new();
        adapter
            .add_table_error("paint", FetchError::QueryError("database is locked".to_string()))
            .await;

        let result = adapter.fetch_table("paint").await;
        assert!(matches!(result, Err(FetchError::QueryError(_))));
    }

    #[tokio::test]
    async fn test_mock_adapter_canned_statements() {
        let adapter = MockAdapterBuilder::new()
            .with_query_result(
                "SELECT id FROM paint",
                QueryOutput::new(["id"]).with_row(vec![json!(1)]),
            )
            .with_query_error("SELECT * FROM piant", "no such table: piant")
            .build();

        let output = adapter.execute("SELECT id FROM paint").await.unwrap();
        assert_eq!(output.rows.len(), 1);

        let err = adapter.execute("SELECT * FROM piant").await.unwrap_err();
        assert_eq!(err.message, "no such table: piant");

        let unknown = adapter.execute("SELECT 1").await.unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_mock_adapter_clone_shares_state() {
        let adapter = MockAdapter::new();
        let cloned = adapter.clone();

        adapter.add_table(TableSchema::new("paint")).await;
        cloned.add_query_error("SELECT * FROM piant", "no such table: piant").await;

        assert_eq!(cloned.list_tables().await.unwrap(), vec!["paint"]);
        assert!(adapter.execute("SELECT * FROM piant").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_adapter_name() {
        assert_eq!(MockAdapter::new().name(), "Mock");
        assert_eq!(MockAdapter::new().with_name("TestSQLite").name(), "TestSQLite");
    }
}
