//! Pre-flight query validation
//!
//! The checker is a pure function of the query text and the table list the
//! caller fetched from the store. It keeps no state between calls.

use crate::alias::AliasTable;
use crate::extract::extract_referenced_tables;
use crate::similarity::{format_table_suggestions, suggest_similar};
use querycheck_core::{CheckerConfig, Diagnostic, DiagnosticCode, Location, Severity};
use regex::{NoExpand, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Table names currently present in the store
///
/// Keeps the caller's order (suggestions follow it) and drops repeats.
/// Membership is exact, matching how the store reports names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSchema {
    tables: Vec<String>,
}

impl KnownSchema {
    /// Create from any list of names
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tables.into_iter().map(Into::into).collect()
    }

    /// Exact membership test
    pub fn contains(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t == table)
    }

    /// Iterate names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(String::as_str)
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when the store reported no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<String> for KnownSchema {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut tables: Vec<String> = Vec::new();
        for table in iter {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        Self { tables }
    }
}

/// Result of a pre-flight check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Nothing to report
    NoIssue,

    /// A referenced table is neither known nor an alias
    UnknownTableWithSuggestion {
        table: String,
        /// Known tables that look like `table`, possibly empty
        candidates: Vec<String>,
    },

    /// A referenced table is a synonym; the query was rewritten
    AliasCorrection {
        original: String,
        corrected: String,
        rewritten_query: String,
    },
}

impl Finding {
    /// True for anything other than `NoIssue`
    pub fn is_issue(&self) -> bool {
        !matches!(self, Self::NoIssue)
    }

    /// Message shown to the caller in place of query results
    pub fn message(&self, known: &KnownSchema) -> Option<String> {
        match self {
            Self::NoIssue => None,
            Self::UnknownTableWithSuggestion { table, candidates } => Some(format!(
                "Table \"{}\" not found. {}",
                table,
                format_table_suggestions(candidates, known.iter())
            )),
            Self::AliasCorrection { original, corrected, rewritten_query } => Some(format!(
                "Table \"{}\" is an alias for \"{}\". Corrected query: {}",
                original, corrected, rewritten_query
            )),
        }
    }

    /// Convert to a report diagnostic
    pub fn to_diagnostic(&self, known: &KnownSchema, location: Option<Location>) -> Option<Diagnostic> {
        let message = self.message(known)?;

        let diagnostic = match self {
            Self::NoIssue => return None,
            Self::UnknownTableWithSuggestion { table, candidates } => {
                let mut diagnostic = Diagnostic::new(DiagnosticCode::QueryUnknownTable, Severity::Error, message)
                    .with_suggestions(vec![format_table_suggestions(candidates, known.iter())]);
                diagnostic.actual = Some(table.clone());
                diagnostic.expected = candidates.first().cloned();
                diagnostic
            }
            Self::AliasCorrection { original, corrected, rewritten_query } => {
                Diagnostic::new(DiagnosticCode::QueryAliasCorrected, Severity::Warn, message)
                    .with_comparison(corrected.clone(), original.clone())
                    .with_suggestions(vec![rewritten_query.clone()])
            }
        };

        Some(match location {
            Some(location) => diagnostic.with_location(location),
            None => diagnostic,
        })
    }
}

/// Query sanity checker
///
/// Holds only immutable configuration, so one instance can serve any number
/// of callers.
#[derive(Debug, Clone)]
pub struct QueryChecker {
    pub(crate) aliases: AliasTable,
    pub(crate) similarity_threshold: f64,
    pub(crate) domain_keywords: Vec<String>,
}

impl QueryChecker {
    /// Checker with built-in aliases and default tuning
    pub fn new() -> Self {
        Self::from_config(&CheckerConfig::default(), &BTreeMap::new())
    }

    /// Checker from configuration; `aliases` extend the built-in synonyms
    pub fn from_config(config: &CheckerConfig, aliases: &BTreeMap<String, String>) -> Self {
        Self {
            aliases: AliasTable::builtin().merged_with(aliases),
            similarity_threshold: config.similarity_threshold,
            domain_keywords: config.domain_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// The alias table in use
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Check a statement against the store's tables before running it
    ///
    /// References are examined in order and the first problem wins: an alias
    /// produces a rewritten query, an unknown table produces suggestions.
    /// A name that is itself a known table is never treated as an alias.
    pub fn validate(&self, query: &str, known: &KnownSchema) -> Finding {
        let referenced = extract_referenced_tables(query);

        for table in &referenced {
            if known.contains(table) {
                continue;
            }

            if let Some(finding) = self.alias_correction(query, table) {
                return finding;
            }

            let candidates = self.suggest_similar(table, known);
            tracing::debug!(table = %table, ?candidates, "unknown table");
            return Finding::UnknownTableWithSuggestion {
                table: table.clone(),
                candidates,
            };
        }

        Finding::NoIssue
    }

    fn alias_correction(&self, query: &str, table: &str) -> Option<Finding> {
        let canonical = self.aliases.resolve(table)?;
        if canonical == table {
            return None;
        }

        let rewritten_query = rewrite_identifier(query, table, canonical)?;
        tracing::debug!(alias = %table, canonical, "rewrote table alias");

        Some(Finding::AliasCorrection {
            original: table.to_string(),
            corrected: canonical.to_string(),
            rewritten_query,
        })
    }

    /// Known tables that look like `name`, using the configured threshold
    pub fn suggest_similar(&self, name: &str, known: &KnownSchema) -> Vec<String> {
        suggest_similar(name, known.iter(), self.similarity_threshold)
    }
}

impl Default for QueryChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace whole-word, case-insensitive occurrences of `identifier`
fn rewrite_identifier(query: &str, identifier: &str, replacement: &str) -> Option<String> {
    let pattern = format!(r"\b{}\b", regex::escape(identifier));
    let re = RegexBuilder::new(&pattern).case_insensitive(true).build().ok()?;
    Some(re.replace_all(query, NoExpand(replacement)).into_owned())
}
