//! # d1-pg-migrate
//!
//! Convert a Cloudflare D1 (SQLite) database dump into a PostgreSQL import
//! script.
//!
//! The dump is executed against an ephemeral in-memory SQLite store, a fixed
//! allow-list of application tables is read back out, and each cell is mapped
//! through column-specific literal rules (booleans, text arrays, nullable
//! strings) into one idempotent `INSERT ... ON CONFLICT ... DO NOTHING`
//! statement per row, wrapped in a single transaction.
//!
//! ## Example
//!
//! ```rust,no_run
//! use d1_pg_migrate::{Config, Orchestrator};
//! use std::path::Path;
//!
//! fn main() -> d1_pg_migrate::Result<()> {
//!     let result = Orchestrator::new(Config::default()).run(Path::new("d1_dump.sql"))?;
//!     println!("{} rows written to {}", result.rows_written, result.output.display());
//!     println!("Apply with: {}", result.apply_command);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod emitter;
pub mod error;
pub mod literal;
pub mod loader;
pub mod orchestrator;
pub mod transcode;
pub mod value;

// Re-exports for convenient access
pub use catalog::{builtin_tables, ColumnMatcher, ColumnRule, TableSpec};
pub use config::{Config, TargetConfig};
pub use error::{MigrateError, Result};
pub use loader::{DumpLoader, LoadReport};
pub use orchestrator::{MigrationResult, Orchestrator, TableOutcome};
pub use value::SqlValue;
