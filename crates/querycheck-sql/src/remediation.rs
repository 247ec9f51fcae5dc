//! Remediation hints for failed executions
//!
//! Classifies the store's error text and produces ordered hints: the
//! error-specific hint first, then the paint usage tip.

use crate::checker::{KnownSchema, QueryChecker};
use crate::similarity::format_table_suggestions;
use querycheck_core::{Diagnostic, DiagnosticCode, Severity};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Tool that lists tables and describes their columns
pub const SCHEMA_INSPECTOR_TOOL: &str = "db_schema_inspector";

/// Tool that prints the paint query guide
pub const QUERY_HELPER_TOOL: &str = "db_paint_query_helper";

static MISSING_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)no such table: (\w+)").expect("missing table pattern is valid")
});

/// Execution failure taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum ErrorClass {
    /// The store has no such table; the name when the message carries one
    MissingTable { table: Option<String> },

    /// The store has no such column
    MissingColumn,

    /// The statement did not parse
    SyntaxError,

    /// Anything else
    Unclassified,
}

impl ErrorClass {
    /// Classify a store error message
    pub fn classify(error_message: &str) -> Self {
        let lower = error_message.to_lowercase();

        if lower.contains("no such table") {
            let table = MISSING_TABLE
                .captures(error_message)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string());
            return Self::MissingTable { table };
        }

        if lower.contains("no such column") {
            return Self::MissingColumn;
        }

        if lower.contains("syntax error") {
            return Self::SyntaxError;
        }

        Self::Unclassified
    }

    /// Stable diagnostic code for this class
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::MissingTable { .. } => DiagnosticCode::ExecMissingTable,
            Self::MissingColumn => DiagnosticCode::ExecMissingColumn,
            Self::SyntaxError => DiagnosticCode::ExecSyntaxError,
            Self::Unclassified => DiagnosticCode::ExecUnclassified,
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable { table: Some(table) } => write!(f, "missing table '{}'", table),
            Self::MissingTable { table: None } => write!(f, "missing table"),
            Self::MissingColumn => write!(f, "missing column"),
            Self::SyntaxError => write!(f, "syntax error"),
            Self::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// Message returned to the caller after a failed execution
pub fn format_execution_failure(error_message: &str, suggestions: &[String]) -> String {
    format!("Error executing query: {}\n\n{}", error_message, suggestions.join("\n"))
}

impl QueryChecker {
    /// Remediation hints for a failed execution
    ///
    /// Never empty: when nothing specific applies, the single generic hint
    /// points at the schema inspector. The table hint needs `known`; without
    /// it a missing-table error gets no table-specific hint.
    pub fn classify_execution_error(
        &self,
        error_message: &str,
        query: &str,
        known: Option<&KnownSchema>,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        match ErrorClass::classify(error_message) {
            ErrorClass::MissingTable { table: Some(table) } => {
                if let Some(known) = known {
                    let candidates = self.suggest_similar(&table, known);
                    suggestions.push(format!(
                        "SUGGESTION: {}",
                        format_table_suggestions(&candidates, known.iter())
                    ));
                }
            }
            ErrorClass::MissingTable { table: None } => {}
            ErrorClass::MissingColumn => suggestions.push(format!(
                "SUGGESTION: Use the \"{}\" tool to see the columns available in the table.",
                SCHEMA_INSPECTOR_TOOL
            )),
            ErrorClass::SyntaxError => suggestions.push(format!(
                "SUGGESTION: Check the SQL syntax. Use the \"{}\" tool to see examples of valid queries.",
                QUERY_HELPER_TOOL
            )),
            ErrorClass::Unclassified => {}
        }

        if self.mentions_domain(query) || self.mentions_domain(error_message) {
            suggestions.push(format!(
                "TIP: To query paints, use the \"paint\" table. Run \"{}\" to see example queries \
                 and the valid values for the enum fields.",
                QUERY_HELPER_TOOL
            ));
        }

        if suggestions.is_empty() {
            suggestions.push(format!(
                "SUGGESTION: Use \"{}\" to discover the structure of the available tables.",
                SCHEMA_INSPECTOR_TOOL
            ));
        }

        suggestions
    }

    /// Diagnostic for a failed execution, carrying the remediation hints
    pub fn execution_diagnostic(
        &self,
        error_message: &str,
        query: &str,
        known: Option<&KnownSchema>,
    ) -> Diagnostic {
        let class = ErrorClass::classify(error_message);
        Diagnostic::new(class.code(), Severity::Error, format!("{}: {}", class, error_message))
            .with_suggestions(self.classify_execution_error(error_message, query, known))
    }

    fn mentions_domain(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.domain_keywords.iter().any(|keyword| lower.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paint_schema() -> KnownSchema {
        KnownSchema::new(["paint", "user"])
    }

    #[test]
    fn test_classify_messages() {
        assert_eq!(
            ErrorClass::classify("no such table: piant"),
            ErrorClass::MissingTable { table: Some("piant".to_string()) }
        );
        assert_eq!(
            ErrorClass::classify("(sqlite3.OperationalError) No Such Table: Orders"),
            ErrorClass::MissingTable { table: Some("Orders".to_string()) }
        );
        assert_eq!(ErrorClass::classify("no such table"), ErrorClass::MissingTable { table: None });
        assert_eq!(ErrorClass::classify("no such column: str_nome"), ErrorClass::MissingColumn);
        assert_eq!(ErrorClass::classify("near \"FORM\": syntax error"), ErrorClass::SyntaxError);
        assert_eq!(ErrorClass::classify("database is locked"), ErrorClass::Unclassified);
    }

    #[test]
    fn test_missing_table_lists_similar_tables() {
        let checker = QueryChecker::new();
        let known = paint_schema();
        let suggestions =
            checker.classify_execution_error("no such table: orders", "SELECT * FROM orders", Some(&known));

        assert_eq!(suggestions, vec!["SUGGESTION: Tables available: paint, user"]);
    }

    #[test]
    fn test_missing_table_with_domain_tip_in_order() {
        let checker = QueryChecker::new();
        let known = paint_schema();
        let suggestions =
            checker.classify_execution_error("no such table: piant", "SELECT * FROM piant", Some(&known));

        // "piant" is not a domain keyword, so only the table hint applies
        assert_eq!(suggestions, vec!["SUGGESTION: Similar tables available: paint"]);

        let suggestions = checker.classify_execution_error(
            "no such table: paints",
            "SELECT * FROM paints",
            Some(&known),
        );
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0], "SUGGESTION: Similar tables available: paint");
        assert!(suggestions[1].starts_with("TIP: To query paints"));
    }

    #[test]
    fn test_missing_table_without_known_tables_falls_back() {
        let checker = QueryChecker::new();
        let suggestions = checker.classify_execution_error("no such table: orders", "SELECT * FROM orders", None);

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains(SCHEMA_INSPECTOR_TOOL));
    }

    #[test]
    fn test_missing_column_hint() {
        let checker = QueryChecker::new();
        let suggestions = checker.classify_execution_error("no such column: nome", "SELECT nome FROM user", None);

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("columns available"));
        assert!(suggestions[0].contains(SCHEMA_INSPECTOR_TOOL));
    }

    #[test]
    fn test_syntax_hint_then_domain_tip() {
        let checker = QueryChecker::new();
        let suggestions = checker.classify_execution_error(
            "near \"FORM\": syntax error",
            "SELECT * FORM paint",
            None,
        );

        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].starts_with("SUGGESTION: Check the SQL syntax"));
        assert!(suggestions[1].starts_with("TIP:"));
    }

    #[test]
    fn test_domain_keyword_in_error_message_counts() {
        let checker = QueryChecker::new();
        let suggestions = checker.classify_execution_error("constraint failed: tinta.id", "DELETE FROM x", None);

        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("TIP:"));
    }

    #[test]
    fn test_unclassified_gets_generic_hint() {
        let checker = QueryChecker::new();
        let suggestions = checker.classify_execution_error("database is locked", "SELECT * FROM user", None);

        assert_eq!(
            suggestions,
            vec![format!(
                "SUGGESTION: Use \"{}\" to discover the structure of the available tables.",
                SCHEMA_INSPECTOR_TOOL
            )]
        );
    }

    #[test]
    fn test_failure_message_format() {
        let message = format_execution_failure(
            "no such column: x",
            &["first".to_string(), "second".to_string()],
        );
        assert_eq!(message, "Error executing query: no such column: x\n\nfirst\nsecond");
    }

    #[test]
    fn test_execution_diagnostic_carries_class() {
        let checker = QueryChecker::new();
        let diag = checker.execution_diagnostic("no such column: nome", "SELECT nome FROM user", None);

        assert_eq!(diag.code, DiagnosticCode::ExecMissingColumn);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.suggestions.len(), 1);
    }
}
