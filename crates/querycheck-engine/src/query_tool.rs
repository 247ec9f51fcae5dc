//! The `db_query` tool
//!
//! Every statement goes through the pre-flight check against the live table
//! list before it reaches the store. A finding replaces the results with its
//! message; a store error comes back with remediation hints.

use querycheck_catalog::{DatabaseAdapter, QueryOutput};
use querycheck_sql::{format_execution_failure, ErrorClass, Finding, KnownSchema, QueryChecker};
use serde::Serialize;
use std::fmt;

/// Tool name
pub const QUERY_TOOL: &str = "db_query";

/// Text returned when a statement produced nothing
pub const NO_RESULTS: &str = "No results found.";

/// What happened to a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The pre-flight check stopped the statement
    Rejected { finding: Finding, message: String },

    /// The statement ran and returned rows (or changed some)
    Rows { output: QueryOutput },

    /// The statement ran and produced nothing
    NoResults,

    /// The store refused the statement
    Failed {
        error: String,
        class: ErrorClass,
        suggestions: Vec<String>,
    },
}

impl QueryOutcome {
    /// True when the statement ran without error
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Rows { .. } | Self::NoResults)
    }

    /// Text handed back to the caller
    pub fn render(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Rows { output } => output.to_string(),
            Self::NoResults => NO_RESULTS.to_string(),
            Self::Failed { error, suggestions, .. } => format_execution_failure(error, suggestions),
        }
    }
}

impl fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Checked query execution against one store
pub struct QueryTool<'a> {
    checker: &'a QueryChecker,
    adapter: &'a dyn DatabaseAdapter,
}

impl<'a> QueryTool<'a> {
    pub fn new(checker: &'a QueryChecker, adapter: &'a dyn DatabaseAdapter) -> Self {
        Self { checker, adapter }
    }

    /// Check, then run, a statement
    ///
    /// When the table list cannot be fetched the statement runs unchecked and
    /// a missing-table error gets no table hint.
    pub async fn run(&self, sql: &str) -> QueryOutcome {
        let known = match self.adapter.list_tables().await {
            Ok(tables) => Some(KnownSchema::new(tables)),
            Err(e) => {
                tracing::warn!(adapter = self.adapter.name(), error = %e, "table listing failed, skipping pre-flight check");
                None
            }
        };

        if let Some(known) = &known {
            let finding = self.checker.validate(sql, known);
            if let Some(message) = finding.message(known) {
                tracing::debug!(?finding, "statement rejected before execution");
                return QueryOutcome::Rejected { finding, message };
            }
        }

        match self.adapter.execute(sql).await {
            Ok(output) if output.is_empty() => QueryOutcome::NoResults,
            Ok(output) => QueryOutcome::Rows { output },
            Err(err) => {
                let class = ErrorClass::classify(&err.message);
                tracing::debug!(%class, error = %err, "statement failed");
                let suggestions = self
                    .checker
                    .classify_execution_error(&err.message, sql, known.as_ref());
                QueryOutcome::Failed {
                    error: err.message,
                    class,
                    suggestions,
                }
            }
        }
    }
}
