//! SQLite store adapter
//!
//! Lists tables from `sqlite_master` and describes them with the
//! `pragma_table_info`, `pragma_foreign_key_list`, `pragma_index_list` and
//! `pragma_index_info` table-valued functions. Statements run on a blocking
//! thread so the async callers are never stalled by the driver.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Path or SQLAlchemy-style URL, read-only
//! let adapter = SqliteAdapter::open("sqlite:///./catalog.db", true)?;
//!
//! // Writable file
//! let adapter = SqliteAdapter::open("catalog.db", false)?;
//! ```

use crate::adapter::{DatabaseAdapter, ExecutionError, FetchError, QueryOutput};
use querycheck_core::TableSchema;

#[cfg(feature = "sqlite")]
use querycheck_core::{Column, ForeignKey, Index, Nullability};

#[cfg(feature = "sqlite")]
use rusqlite::{types::ValueRef, Connection, OpenFlags};

#[cfg(feature = "sqlite")]
use std::sync::{Arc, Mutex};

/// SQLite store adapter
pub struct SqliteAdapter {
    /// Shared connection (only available with sqlite feature)
    #[cfg(feature = "sqlite")]
    conn: Arc<Mutex<Connection>>,

    /// File path the connection was opened with
    path: String,
}

impl SqliteAdapter {
    /// Extract the file path from a `sqlite://` URL, or return a plain path unchanged
    ///
    /// `sqlite:///./catalog.db` is the relative path `./catalog.db` and
    /// `sqlite:////var/db/catalog.db` the absolute `/var/db/catalog.db`.
    pub fn path_from_url(url: &str) -> &str {
        url.strip_prefix("sqlite:///")
            .or_else(|| url.strip_prefix("sqlite://"))
            .unwrap_or(url)
    }

    /// Open a store file
    #[cfg(feature = "sqlite")]
    pub fn open(url: &str, read_only: bool) -> Result<Self, FetchError> {
        let path = Self::path_from_url(url).to_string();
        if path.is_empty() {
            return Err(FetchError::ConfigError(format!("No database path in '{}'", url)));
        }

        let conn = if read_only {
            Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        } else {
            Connection::open(&path)
        }
        .map_err(|e| FetchError::ConnectionError(format!("Failed to open SQLite database {}: {}", path, e)))?;

        tracing::info!(path = %path, read_only, "opened SQLite store");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Open adapter without sqlite feature (returns error)
    #[cfg(not(feature = "sqlite"))]
    pub fn open(_url: &str, _read_only: bool) -> Result<Self, FetchError> {
        Err(FetchError::ConfigError(
            "SQLite support not compiled. Rebuild with: cargo build --features sqlite".to_string(),
        ))
    }

    /// Wrap an existing connection (e.g. an in-memory database)
    #[cfg(feature = "sqlite")]
    pub fn from_connection(conn: Connection) -> Self {
        let path = conn.path().unwrap_or(":memory:").to_string();
        Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        }
    }

    /// File path of the store
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `f` against the connection on a blocking thread
    #[cfg(feature = "sqlite")]
    async fn run_blocking<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| "SQLite connection lock poisoned".to_string())?;
            f(&conn).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("SQLite task failed: {}", e))?
    }
}

#[cfg(feature = "sqlite")]
fn list_tables_blocking(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

#[cfg(feature = "sqlite")]
fn describe_table_blocking(conn: &Connection, table: &str) -> rusqlite::Result<TableSchema> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid",
    )?;
    let columns = stmt
        .query_map([table], |row| {
            let name: String = row.get(0)?;
            let declared: String = row.get(1)?;
            let not_null: bool = row.get(2)?;
            let default: Option<String> = row.get(3)?;
            let pk: i64 = row.get(4)?;

            let mut column = Column::new(name, declared).with_nullability(if not_null {
                Nullability::No
            } else {
                Nullability::Yes
            });
            if let Some(default) = default {
                column = column.with_default(default);
            }
            if pk > 0 {
                column = column.primary_key();
            }
            Ok(column)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut table_schema = TableSchema::from_columns(table, columns);

    // One row per column pair; rows sharing an id form one constraint
    let mut stmt = conn.prepare(
        "SELECT id, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
    )?;
    let mut rows = stmt.query([table])?;
    let mut current: Option<(i64, ForeignKey)> = None;
    while let Some(row) = rows.next()? {
        let id: i64 = row.get(0)?;
        let referred_table: String = row.get(1)?;
        let from: String = row.get(2)?;
        let to: Option<String> = row.get(3)?;

        if let Some((current_id, fk)) = current.as_mut() {
            if *current_id == id {
                fk.constrained_columns.push(from);
                fk.referred_columns.extend(to);
                continue;
            }
        }

        if let Some((_, fk)) = current.take() {
            table_schema.foreign_keys.push(fk);
        }
        current = Some((
            id,
            ForeignKey {
                constrained_columns: vec![from],
                referred_table,
                referred_columns: to.into_iter().collect(),
            },
        ));
    }
    if let Some((_, fk)) = current {
        table_schema.foreign_keys.push(fk);
    }

    let mut stmt = conn.prepare("SELECT name, \"unique\" FROM pragma_index_list(?1) ORDER BY name")?;
    let indexes = stmt
        .query_map([table], |row| Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
    for (name, unique) in indexes {
        let column_names = stmt
            .query_map([&name], |row| row.get::<_, Option<String>>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();
        table_schema.indexes.push(Index {
            name,
            column_names,
            unique,
        });
    }

    Ok(table_schema)
}

#[cfg(feature = "sqlite")]
fn execute_blocking(conn: &Connection, sql: &str) -> rusqlite::Result<QueryOutput> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    if columns.is_empty() {
        let changed = stmt.execute([])?;
        return Ok(QueryOutput::affected(changed));
    }

    let mut output = QueryOutput::new(columns);
    let width = output.columns.len();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(value_to_json(row.get_ref(i)?));
        }
        output.rows.push(values);
    }

    Ok(output)
}

#[cfg(feature = "sqlite")]
fn value_to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => serde_json::Value::String(format!("<{} bytes>", bytes.len())),
    }
}

#[cfg(feature = "sqlite")]
#[async_trait::async_trait]
impl DatabaseAdapter for SqliteAdapter {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        self.run_blocking(list_tables_blocking)
            .await
            .map_err(FetchError::QueryError)
    }

    async fn fetch_table(&self, table: &str) -> Result<TableSchema, FetchError> {
        let tables = self.list_tables().await?;
        if !tables.iter().any(|t| t == table) {
            return Err(FetchError::TableNotFound(table.to_string()));
        }

        let table = table.to_string();
        self.run_blocking(move |conn| describe_table_blocking(conn, &table))
            .await
            .map_err(FetchError::QueryError)
    }

    async fn execute(&self, sql: &str) -> Result<QueryOutput, ExecutionError> {
        let sql = sql.to_string();
        tracing::debug!(sql = %sql, "executing statement");
        self.run_blocking(move |conn| execute_blocking(conn, &sql))
            .await
            .map_err(ExecutionError::new)
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        self.run_blocking(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .await
            .map(|_| ())
            .map_err(FetchError::ConnectionError)
    }
}

#[cfg(not(feature = "sqlite"))]
#[async_trait::async_trait]
impl DatabaseAdapter for SqliteAdapter {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    async fn list_tables(&self) -> Result<Vec<String>, FetchError> {
        Err(FetchError::ConfigError("SQLite support not compiled".to_string()))
    }

    async fn fetch_table(&self, _table: &str) -> Result<TableSchema, FetchError> {
        Err(FetchError::ConfigError("SQLite support not compiled".to_string()))
    }

    async fn execute(&self, _sql: &str) -> Result<QueryOutput, ExecutionError> {
        Err(ExecutionError::new("SQLite support not compiled"))
    }

    async fn test_connection(&self) -> Result<(), FetchError> {
        Err(FetchError::ConfigError("SQLite support not compiled".to_string()))
    }
}
