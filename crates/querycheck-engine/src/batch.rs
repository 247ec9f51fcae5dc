//! Pre-flight checks over a whole SQL file
//!
//! Statements are split on `;` without looking at literals or comments,
//! the same limitation the table extraction has.

use querycheck_core::{Location, Report};
use querycheck_sql::{KnownSchema, QueryChecker};

/// One statement and the line it starts on (1-based)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    pub line: usize,
}

/// Checks every statement of a file against one table list
pub struct StatementBatch<'a> {
    checker: &'a QueryChecker,
    file: String,
}

impl<'a> StatementBatch<'a> {
    /// `file` is used for diagnostic locations only
    pub fn new(checker: &'a QueryChecker, file: impl Into<String>) -> Self {
        Self {
            checker,
            file: file.into(),
        }
    }

    /// Split a file into statements, skipping blank and comment-only ones
    pub fn split(sql_text: &str) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut line = 1;

        for segment in sql_text.split(';') {
            let mut start_line = line;
            let mut rest = segment;
            line += segment.matches('\n').count();

            // Leading blank and `--` lines belong to no statement
            while let Some((first, tail)) = rest.split_once('\n') {
                let first = first.trim();
                if !first.is_empty() && !first.starts_with("--") {
                    break;
                }
                start_line += 1;
                rest = tail;
            }

            let text = rest.trim();
            if text.is_empty() || text.starts_with("--") {
                continue;
            }
            statements.push(Statement {
                text: text.to_string(),
                line: start_line,
            });
        }

        statements
    }

    /// Check every statement and collect the findings into a report
    pub fn check(&self, sql_text: &str, known: &KnownSchema) -> Report {
        let statements = Self::split(sql_text);
        let mut report = Report::new().with_statements_checked(statements.len());

        for statement in &statements {
            let finding = self.checker.validate(&statement.text, known);
            let location = Location::with_line(self.file.clone(), statement.line);
            if let Some(diagnostic) = finding.to_diagnostic(known, Some(location)) {
                tracing::debug!(line = statement.line, code = %diagnostic.code, "statement finding");
                report.add_diagnostic(diagnostic);
            }
        }

        report
    }
}
