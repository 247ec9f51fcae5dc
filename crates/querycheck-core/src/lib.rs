//! QueryCheck Core
//!
//! Core domain model shared by the checker, the catalog adapters and the tools.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod report;
pub mod config;
pub mod paint;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use schema::{Column, TableSchema, Nullability, ForeignKey, Index};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, DatabaseConfig, CheckerConfig};
pub use paint::{SurfaceType, Environment, FinishType, PaintFeature, PaintLine};
