//! Integration tests for the pre-flight checker
//!
//! These exercise the public API the query tool uses: validate before running
//! a statement, classify the error after a failed run.

use pretty_assertions::assert_eq;
use querycheck_core::{CheckerConfig, DiagnosticCode};
use querycheck_sql::{
    extract_referenced_tables, format_execution_failure, similarity, Finding, KnownSchema,
    QueryChecker, SIMILARITY_THRESHOLD,
};
use std::collections::BTreeMap;

fn paint_schema() -> KnownSchema {
    KnownSchema::new(["paint", "user"])
}

#[test]
fn test_statements_without_table_clauses_pass() {
    let checker = QueryChecker::new();
    let known = paint_schema();

    for sql in ["SELECT 1", "select 1 + 1", "PRAGMA foreign_keys = ON", "VALUES (1), (2)"] {
        assert!(extract_referenced_tables(sql).is_empty(), "{}", sql);
        assert_eq!(checker.validate(sql, &known), Finding::NoIssue, "{}", sql);
    }
}

#[test]
fn test_extraction_examples() {
    assert_eq!(extract_referenced_tables("SELECT * FROM paint WHERE x=1"), vec!["paint"]);
    assert_eq!(extract_referenced_tables("SELECT * FROM a JOIN b"), vec!["a", "b"]);
}

#[test]
fn test_alias_correction_rewrites_query() {
    let finding = QueryChecker::new().validate("SELECT * FROM tintas", &paint_schema());

    match finding {
        Finding::AliasCorrection { original, corrected, rewritten_query } => {
            assert_eq!(original, "tintas");
            assert_eq!(corrected, "paint");
            assert_eq!(rewritten_query, "SELECT * FROM paint");
        }
        other => panic!("expected alias correction, got {:?}", other),
    }
}

#[test]
fn test_misspelled_table_suggests_paint() {
    let finding = QueryChecker::new().validate("SELECT * FROM piant", &paint_schema());

    match finding {
        Finding::UnknownTableWithSuggestion { table, candidates } => {
            assert_eq!(table, "piant");
            assert!(candidates.contains(&"paint".to_string()));
        }
        other => panic!("expected unknown table, got {:?}", other),
    }
}

#[test]
fn test_similarity_boundaries() {
    assert_eq!(similarity("", "paint"), 0.0);
    assert_eq!(similarity("paint", "paint"), 1.0);
    assert!(similarity("piant", "paint") >= SIMILARITY_THRESHOLD);
}

#[test]
fn test_missing_table_error_mentions_known_tables() {
    let checker = QueryChecker::new();
    let known = paint_schema();
    let suggestions =
        checker.classify_execution_error("no such table: piant", "SELECT * FROM piant", Some(&known));

    assert!(suggestions.iter().any(|s| s.contains("paint")));
}

#[test]
fn test_domain_tip_always_follows_specific_hint() {
    let checker = QueryChecker::new();

    let cases = [
        ("no such table: paints", "SELECT * FROM paints"),
        ("no such column: str_nome", "SELECT str_nome FROM paint"),
        ("near \"WERE\": syntax error", "SELECT * FROM paint WERE 1"),
        ("no such column: cor", "SELECT cor FROM tinta"),
    ];

    for (error, query) in cases {
        let suggestions = checker.classify_execution_error(error, query, Some(&paint_schema()));
        assert_eq!(suggestions.len(), 2, "{}", error);
        assert!(suggestions[0].starts_with("SUGGESTION:"), "{}", error);
        assert!(suggestions[1].starts_with("TIP:"), "{}", error);
    }
}

#[test]
fn test_validate_is_idempotent() {
    let checker = QueryChecker::new();
    let known = paint_schema();

    for sql in ["SELECT * FROM tintas", "SELECT * FROM piant", "SELECT * FROM paint"] {
        assert_eq!(checker.validate(sql, &known), checker.validate(sql, &known));
    }
}

#[test]
fn test_checker_is_shareable_across_threads() {
    let checker = std::sync::Arc::new(QueryChecker::new());
    let known = std::sync::Arc::new(paint_schema());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let checker = checker.clone();
            let known = known.clone();
            std::thread::spawn(move || checker.validate("SELECT * FROM usuarios", &known))
        })
        .collect();

    for handle in handles {
        let finding = handle.join().unwrap();
        assert!(matches!(finding, Finding::AliasCorrection { ref corrected, .. } if corrected == "user"));
    }
}

#[test]
fn test_stricter_threshold_drops_positional_matches() {
    let config = CheckerConfig {
        similarity_threshold: 0.8,
        ..CheckerConfig::default()
    };
    let checker = QueryChecker::from_config(&config, &BTreeMap::new());

    let finding = checker.validate("SELECT * FROM piant", &paint_schema());
    assert_eq!(
        finding,
        Finding::UnknownTableWithSuggestion {
            table: "piant".to_string(),
            candidates: Vec::new(),
        }
    );
}

#[test]
fn test_unknown_table_flow_end_to_end() {
    let checker = QueryChecker::new();
    let known = paint_schema();
    let sql = "SELECT * FROM orders";

    let finding = checker.validate(sql, &known);
    let diagnostic = finding.to_diagnostic(&known, None).unwrap();
    assert_eq!(diagnostic.code, DiagnosticCode::QueryUnknownTable);
    assert_eq!(
        finding.message(&known).unwrap(),
        "Table \"orders\" not found. Tables available: paint, user"
    );

    let suggestions = checker.classify_execution_error("no such table: orders", sql, Some(&known));
    let message = format_execution_failure("no such table: orders", &suggestions);
    assert_eq!(
        message,
        "Error executing query: no such table: orders\n\nSUGGESTION: Tables available: paint, user"
    );
}
