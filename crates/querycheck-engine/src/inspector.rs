//! The `db_schema_inspector` tool

use querycheck_catalog::{DatabaseAdapter, FetchError};
use querycheck_core::{Nullability, TableSchema};
use std::fmt::Write;

/// Tables whose name contains this get a column preview in the listing
const PREVIEW_KEYWORD: &str = "paint";

/// Columns shown per previewed table
const PREVIEW_COLUMNS: usize = 5;

/// Describes the store's tables in plain text
pub struct SchemaInspector<'a> {
    adapter: &'a dyn DatabaseAdapter,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(adapter: &'a dyn DatabaseAdapter) -> Self {
        Self { adapter }
    }

    /// Structure of one table, or the list of all tables
    ///
    /// Never fails; introspection errors are reported in the returned text.
    pub async fn run(&self, table: Option<&str>) -> String {
        match self.inspect(table).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(adapter = self.adapter.name(), error = %e, "schema inspection failed");
                format!("Error inspecting database: {}", e)
            }
        }
    }

    /// Structure of one table, or the list of all tables
    ///
    /// An unknown table is not an error: the text names it and lists the
    /// tables that do exist.
    pub async fn inspect(&self, table: Option<&str>) -> Result<String, FetchError> {
        let tables = self.adapter.list_tables().await?;

        match table {
            Some(name) if !tables.iter().any(|t| t == name) => Ok(format!(
                "Table \"{}\" not found. Tables available: {}",
                name,
                tables.join(", ")
            )),
            Some(name) => {
                let schema = self.adapter.fetch_table(name).await?;
                Ok(describe_table(&schema))
            }
            None => self.list(&tables).await,
        }
    }

    async fn list(&self, tables: &[String]) -> Result<String, FetchError> {
        let mut out = String::from("=== AVAILABLE TABLES ===\n\n");

        for table in tables {
            let _ = writeln!(out, "- {}", table);

            if table.to_lowercase().contains(PREVIEW_KEYWORD) {
                let schema = self.adapter.fetch_table(table).await?;
                out.push_str("  Main columns:\n");
                for column in schema.columns.iter().take(PREVIEW_COLUMNS) {
                    let _ = writeln!(out, "    {} ({})", column.name, column.type_label());
                }
                if schema.columns.len() > PREVIEW_COLUMNS {
                    let _ = writeln!(
                        out,
                        "    ... and {} more columns",
                        schema.columns.len() - PREVIEW_COLUMNS
                    );
                }
                out.push('\n');
            }
        }

        Ok(out)
    }
}

/// Columns, foreign keys and indexes of a table
pub fn describe_table(schema: &TableSchema) -> String {
    let mut out = format!("=== TABLE STRUCTURE: {} ===\n\nCOLUMNS:\n", schema.name);

    for column in &schema.columns {
        let not_null = if column.nullable == Nullability::No { " NOT NULL" } else { "" };
        let default = column
            .default
            .as_ref()
            .map(|d| format!(" DEFAULT {}", d))
            .unwrap_or_default();
        let _ = writeln!(out, "  - {}: {}{}{}", column.name, column.type_label(), not_null, default);
    }

    if !schema.foreign_keys.is_empty() {
        out.push_str("\nFOREIGN KEYS:\n");
        for fk in &schema.foreign_keys {
            let _ = writeln!(
                out,
                "  - {} -> {}.{}",
                fk.constrained_columns.join(", "),
                fk.referred_table,
                fk.referred_columns.join(", ")
            );
        }
    }

    if !schema.indexes.is_empty() {
        out.push_str("\nINDEXES:\n");
        for index in &schema.indexes {
            let unique = if index.unique { " (unique)" } else { "" };
            let _ = writeln!(out, "  - {}: {}{}", index.name, index.column_names.join(", "), unique);
        }
    }

    out
}
