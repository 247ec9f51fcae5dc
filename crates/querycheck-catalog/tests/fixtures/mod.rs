//! Test fixtures for store adapter integration tests
//!
//! The paint catalog tables, described the way introspection reports them.

use querycheck_core::{Column, ForeignKey, Index, Nullability, TableSchema};

/// The `user` table
pub fn user_table() -> TableSchema {
    TableSchema::from_columns(
        "user",
        vec![
            Column::new("id", "INTEGER").primary_key().with_nullability(Nullability::No),
            Column::new("str_email", "VARCHAR(255)").with_nullability(Nullability::No),
            Column::new("str_name", "VARCHAR(100)").with_nullability(Nullability::Yes),
        ],
    )
}

/// The `paint` table
///
/// Enum columns hold the wire values of the paint vocabulary; the owner is
/// a foreign key to `user`.
pub fn paint_table() -> TableSchema {
    TableSchema::from_columns(
        "paint",
        vec![
            Column::new("id", "INTEGER").primary_key().with_nullability(Nullability::No),
            Column::new("str_name", "VARCHAR").with_nullability(Nullability::No),
            Column::new("str_color", "VARCHAR").with_nullability(Nullability::No),
            Column::new("enum_surface_type", "VARCHAR(8)").with_nullability(Nullability::No),
            Column::new("enum_environment", "VARCHAR(8)")
                .with_nullability(Nullability::No)
                .with_default("'both'"),
            Column::new("enum_finish_type", "VARCHAR(10)").with_nullability(Nullability::No),
            Column::new("str_features", "VARCHAR(500)").with_nullability(Nullability::Yes),
            Column::new("enum_paint_line", "VARCHAR(12)").with_nullability(Nullability::No),
            Column::new("created_by_user_id", "INTEGER").with_nullability(Nullability::No),
        ],
    )
    .with_foreign_key(ForeignKey {
        constrained_columns: vec!["created_by_user_id".to_string()],
        referred_table: "user".to_string(),
        referred_columns: vec!["id".to_string()],
    })
    .with_index(Index {
        name: "ix_paint_str_name".to_string(),
        column_names: vec!["str_name".to_string()],
        unique: false,
    })
}

/// DDL that produces the same two tables in SQLite
#[allow(dead_code)]
pub const PAINT_CATALOG_DDL: &str = "
CREATE TABLE user (
    id INTEGER NOT NULL PRIMARY KEY,
    str_email VARCHAR(255) NOT NULL,
    str_name VARCHAR(100)
);
CREATE TABLE paint (
    id INTEGER NOT NULL PRIMARY KEY,
    str_name VARCHAR NOT NULL,
    str_color VARCHAR NOT NULL,
    enum_surface_type VARCHAR(8) NOT NULL,
    enum_environment VARCHAR(8) NOT NULL DEFAULT 'both',
    enum_finish_type VARCHAR(10) NOT NULL,
    str_features VARCHAR(500),
    enum_paint_line VARCHAR(12) NOT NULL,
    created_by_user_id INTEGER NOT NULL REFERENCES user (id)
);
CREATE INDEX ix_paint_str_name ON paint (str_name);
INSERT INTO user (id, str_email, str_name) VALUES (1, 'admin@example.com', 'Admin');
INSERT INTO paint VALUES
    (1, 'Suvinil Toque de Seda', 'Branco Gelo', 'masonry', 'internal', 'satin', 'washable,odorless', 'premium', 1),
    (2, 'Coral Esmalte Sintético', 'Azul Petróleo', 'wood', 'external', 'gloss', 'uv_resistant', 'standard', 1);
";
