//! Table name similarity
//!
//! `similarity` is a positional character-match ratio, not an edit distance.
//! It under-scores insertions and shifted characters ("paints" vs "spaint"),
//! and suggestion lists depend on exactly this behavior.

/// Default minimum similarity for a table to be suggested
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Fraction of positions holding the same character in both strings
///
/// Counts matches over the first `min(len a, len b)` characters and divides by
/// `max(len a, len b)`. Returns `0.0` when either string is empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let len_a = a.chars().count();
    let len_b = b.chars().count();

    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let matches = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();

    matches as f64 / len_a.max(len_b) as f64
}

/// Known tables that look like `name`
///
/// A table is kept when either name contains the other (case-insensitive) or
/// their lowercased similarity reaches `threshold`. Order follows `known_tables`.
pub fn suggest_similar<'a, I>(name: &str, known_tables: I, threshold: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let name_lower = name.to_lowercase();

    known_tables
        .into_iter()
        .filter(|candidate| {
            let candidate_lower = candidate.to_lowercase();
            candidate_lower.contains(&name_lower)
                || name_lower.contains(&candidate_lower)
                || similarity(&name_lower, &candidate_lower) >= threshold
        })
        .map(str::to_string)
        .collect()
}

/// Render candidates, or every known table when there are none
pub fn format_table_suggestions<'a, I>(candidates: &[String], known_tables: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    if candidates.is_empty() {
        let all: Vec<&str> = known_tables.into_iter().collect();
        format!("Tables available: {}", all.join(", "))
    } else {
        format!("Similar tables available: {}", candidates.join(", "))
    }
}
