//! Table reference extraction

use regex::Regex;
use std::sync::LazyLock;

static TABLE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:FROM|JOIN|INTO|UPDATE)\s+(\w+)").expect("table reference pattern is valid")
});

/// Extract every identifier that follows `FROM`, `JOIN`, `INTO` or `UPDATE`
///
/// Keywords match case-insensitively. Identifiers are returned in order of
/// appearance, duplicates included. Subqueries (`FROM (`) and quoted names do
/// not match because the identifier must be a run of word characters.
pub fn extract_referenced_tables(query: &str) -> Vec<String> {
    TABLE_REFERENCE
        .captures_iter(query)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
