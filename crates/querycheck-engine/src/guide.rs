//! The `db_paint_query_helper` tool
//!
//! Static guide for querying the `paint` table. Enum values are rendered
//! from the paint vocabulary so the guide cannot drift from what is stored.

use querycheck_core::{Environment, FinishType, PaintFeature, PaintLine, SurfaceType};
use std::fmt::Write;

/// Main columns of the `paint` table with their declared types
const PAINT_COLUMNS: &[(&str, &str, &str)] = &[
    ("id", "INTEGER", "primary key"),
    ("str_name", "VARCHAR", "paint name"),
    ("str_color", "VARCHAR", "paint color"),
    ("enum_surface_type", "VARCHAR(8)", "surface type"),
    ("enum_environment", "VARCHAR(8)", "environment of use"),
    ("enum_finish_type", "VARCHAR(10)", "finish type"),
    ("str_features", "VARCHAR(500)", "special features, comma-separated"),
    ("enum_paint_line", "VARCHAR(12)", "product line"),
    ("created_by_user_id", "INTEGER", "user who created it"),
];

const EXAMPLES: &[(&str, &str)] = &[
    ("List every paint", "SELECT * FROM paint;"),
    (
        "Paints for outdoor use",
        "SELECT * FROM paint WHERE enum_environment IN ('external', 'both');",
    ),
    (
        "Premium paints for wood",
        "SELECT * FROM paint WHERE enum_paint_line = 'premium' AND enum_surface_type = 'wood';",
    ),
    ("Search by color", "SELECT * FROM paint WHERE str_color LIKE '%azul%';"),
    (
        "Paints with a given feature",
        "SELECT * FROM paint WHERE str_features LIKE '%washable%';",
    ),
    (
        "Count paints per product line",
        "SELECT enum_paint_line, COUNT(*) FROM paint GROUP BY enum_paint_line;",
    ),
];

/// Query guide for the `paint` table
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryGuide;

impl QueryGuide {
    pub fn render() -> String {
        let mut out = String::from("=== QUERY GUIDE FOR THE PAINT TABLE ===\n\nTABLE NAME: paint\n\nMAIN COLUMNS:\n");

        for (name, declared, description) in PAINT_COLUMNS {
            let _ = writeln!(out, "- {}: {} ({})", name, declared, description);
        }

        out.push_str("\nVALID ENUM VALUES:\n");
        enum_section(
            &mut out,
            SurfaceType::COLUMN,
            SurfaceType::ALL.iter().map(|v| (v.as_str(), v.label())),
        );
        enum_section(
            &mut out,
            Environment::COLUMN,
            Environment::ALL.iter().map(|v| (v.as_str(), v.label())),
        );
        enum_section(
            &mut out,
            FinishType::COLUMN,
            FinishType::ALL.iter().map(|v| (v.as_str(), v.label())),
        );
        enum_section(
            &mut out,
            PaintLine::COLUMN,
            PaintLine::ALL.iter().map(|v| (v.as_str(), v.label())),
        );
        enum_section(
            &mut out,
            PaintFeature::COLUMN,
            PaintFeature::ALL.iter().map(|v| (v.as_str(), v.label())),
        );

        out.push_str("\nEXAMPLE QUERIES:\n");
        for (i, (title, sql)) in EXAMPLES.iter().enumerate() {
            let _ = write!(out, "\n{}. {}:\n   {}\n", i + 1, title, sql);
        }

        out
    }
}

fn enum_section<'a>(out: &mut String, column: &str, values: impl Iterator<Item = (&'a str, &'a str)>) {
    let _ = writeln!(out, "\n{}:", column);
    for (value, label) in values {
        let _ = writeln!(out, "- '{}' ({})", value, label);
    }
}
