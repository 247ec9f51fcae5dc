//! Table schema types
//!
//! This is what a schema-introspection collaborator reports about a table.

use serde::{Deserialize, Serialize};

/// Nullability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    /// Definitely nullable
    Yes,

    /// Definitely not nullable
    No,

    /// Cannot determine nullability
    Unknown,
}

/// A column in a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Type exactly as declared by the store; SQLite allows an empty one
    pub declared_type: String,

    /// Nullability
    pub nullable: Nullability,

    /// Default expression, if any
    pub default: Option<String>,

    /// Part of the primary key
    pub primary_key: bool,
}

impl Column {
    /// Create a column with unknown nullability and no default
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: Nullability::Unknown,
            default: None,
            primary_key: false,
        }
    }

    /// Set nullability
    pub fn with_nullability(mut self, nullable: Nullability) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the default expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark as primary key
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Type to show to users
    pub fn type_label(&self) -> &str {
        if self.declared_type.trim().is_empty() {
            "UNTYPED"
        } else {
            &self.declared_type
        }
    }
}

/// A foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Columns in this table
    pub constrained_columns: Vec<String>,

    /// Referenced table
    pub referred_table: String,

    /// Columns in the referenced table
    pub referred_columns: Vec<String>,
}

/// An index on a table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Index {
    /// Index name
    pub name: String,

    /// Indexed columns, in index order
    pub column_names: Vec<String>,

    /// Unique index
    pub unique: bool,
}

/// A table as reported by schema introspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,

    /// Ordered list of columns
    pub columns: Vec<Column>,

    /// Foreign keys
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,

    /// Indexes
    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl TableSchema {
    /// Create a new empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Create a table from columns
    pub fn from_columns(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::new(name)
        }
    }

    /// Add a foreign key
    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Add an index
    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
