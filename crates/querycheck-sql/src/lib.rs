//! SQL pre-flight checks
//!
//! This crate handles:
//! - Extracting table references from FROM/JOIN/INTO/UPDATE clauses
//! - Rewriting informal table synonyms to canonical names
//! - Suggesting known tables for unknown identifiers
//! - Turning store error messages into remediation hints
//!
//! Nothing here parses SQL. Extraction is a regex heuristic and does not see
//! string literals or comments, so a keyword inside a literal is treated as a
//! real reference. Callers rely on that matching behavior.

pub mod extract;
pub mod similarity;
pub mod alias;
pub mod checker;
pub mod remediation;

pub use extract::extract_referenced_tables;
pub use similarity::{similarity, suggest_similar, format_table_suggestions, SIMILARITY_THRESHOLD};
pub use alias::AliasTable;
pub use checker::{QueryChecker, KnownSchema, Finding};
pub use remediation::{ErrorClass, format_execution_failure, SCHEMA_INSPECTOR_TOOL, QUERY_HELPER_TOOL};
