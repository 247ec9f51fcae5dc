//! QueryCheck engine - the tools an assistant calls
//!
//! This crate puts the checker in front of a store adapter:
//! - `db_query`: pre-flight check, execution and remediation hints
//! - `db_schema_inspector`: table listing and table structure
//! - `db_paint_query_helper`: the paint table query guide
//! - Batch checks of multi-statement files into a report

pub mod query_tool;
pub mod inspector;
pub mod guide;
pub mod batch;

pub use query_tool::{QueryTool, QueryOutcome, QUERY_TOOL, NO_RESULTS};
pub use inspector::SchemaInspector;
pub use guide::QueryGuide;
pub use batch::{StatementBatch, Statement};
