//! Dump loading into the ephemeral SQLite store.

use std::path::Path;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::{MigrateError, Result};

/// Outcome of executing the dump against the ephemeral store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Every statement in the dump executed.
    Clean,

    /// Execution failed partway; whatever ran before the failure is kept.
    Partial { error: String },
}

impl LoadReport {
    /// Error text for a partial load, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadReport::Clean => None,
            LoadReport::Partial { error } => Some(error),
        }
    }
}

/// Executes a dump file against a fresh in-memory store.
///
/// Dumps often carry statements that are harmless to skip (duplicate schema
/// assertions, engine-specific pragmas), so load errors are tolerated by
/// default and the partial state is used downstream. Strict mode turns a
/// load error into a failed run instead.
#[derive(Debug, Clone, Copy)]
pub struct DumpLoader {
    strict: bool,
}

impl DumpLoader {
    /// Create a loader with the given strictness.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Read the dump file and execute it against a new in-memory store.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, if the store cannot be created, or
    /// (in strict mode only) if the batch does not execute cleanly.
    pub fn load(&self, path: &Path) -> Result<(Connection, LoadReport)> {
        let script = std::fs::read_to_string(path)?;
        info!("Loading {} into temporary SQLite store", path.display());
        self.load_script(&script)
    }

    /// Execute dump text against a new in-memory store.
    pub fn load_script(&self, script: &str) -> Result<(Connection, LoadReport)> {
        let conn = Connection::open_in_memory()?;
        let report = match conn.execute_batch(script) {
            Ok(()) => LoadReport::Clean,
            Err(e) if self.strict => return Err(MigrateError::DumpLoad(e.to_string())),
            Err(e) => {
                warn!("Error loading dump, continuing with partial state: {}", e);
                LoadReport::Partial {
                    error: e.to_string(),
                }
            }
        };
        Ok((conn, report))
    }
}
