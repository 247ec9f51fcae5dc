//! Store adapters for schema introspection and query execution
//!
//! The checker never touches the store itself. These adapters are the
//! collaborators that report which tables exist, describe a table, and run a
//! statement, returning the store's own error text on failure.
//!
//! ## Features
//!
//! Enable store support via Cargo features:
//! - `sqlite` - SQLite files (bundled driver)
//!
//! ## Example
//!
//! ```rust,ignore
//! use querycheck_catalog::{DatabaseAdapter, SqliteAdapter};
//!
//! let adapter = SqliteAdapter::open("sqlite:///./catalog.db", true)?;
//! let tables = adapter.list_tables().await?;
//! let paint = adapter.fetch_table("paint").await?;
//! ```

pub mod adapter;
pub mod mock;
pub mod sqlite;

pub use adapter::{DatabaseAdapter, FetchError, ExecutionError, QueryOutput};
pub use mock::{MockAdapter, MockAdapterBuilder};
pub use sqlite::SqliteAdapter;
