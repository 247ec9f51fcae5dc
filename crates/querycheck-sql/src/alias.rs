//! Informal table synonyms
//!
//! Users (and the agent) often name tables the way they speak: "tintas",
//! "usuarios". The alias table maps those words to canonical table names.

use std::collections::BTreeMap;
use std::sync::LazyLock;

static BUILTIN: LazyLock<AliasTable> = LazyLock::new(|| {
    AliasTable::from_entries([
        ("tinta", "paint"),
        ("tintas", "paint"),
        ("paints", "paint"),
        ("usuario", "user"),
        ("usuarios", "user"),
        ("users", "user"),
    ])
});

/// Immutable synonym -> canonical table mapping
///
/// Keys are stored lowercased; lookups fold case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// The built-in paint catalog synonyms
    pub fn builtin() -> &'static AliasTable {
        &BUILTIN
    }

    /// Build a table from `(alias, canonical)` pairs
    ///
    /// Later entries replace earlier ones with the same (case-folded) alias.
    pub fn from_entries<I, A, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(alias, canonical)| (alias.as_ref().to_lowercase(), canonical.into()))
                .collect(),
        }
    }

    /// A new table with `overrides` merged over this one
    pub fn merged_with<'a, I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut entries = self.entries.clone();
        for (alias, canonical) in overrides {
            entries.insert(alias.to_lowercase(), canonical.clone());
        }
        Self { entries }
    }

    /// Canonical table name for an identifier, if it is a known synonym
    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        self.entries.get(&identifier.to_lowercase()).map(String::as_str)
    }

    /// Number of synonyms
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no synonyms
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(alias, canonical)` pairs in alias order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}
