//! End-to-end conversion pipeline: load, transcode, emit.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{builtin_tables, TableSpec};
use crate::config::Config;
use crate::emitter;
use crate::error::Result;
use crate::loader::DumpLoader;
use crate::transcode::{self, TableScript};

/// Outcome of processing one allow-listed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    /// All rows transcoded into the output script.
    Migrated { table: String, rows: usize },

    /// Table absent from the loaded store.
    SkippedMissing { table: String },

    /// Table present but transcoding failed; its output is absent.
    Failed { table: String, message: String },
}

impl TableOutcome {
    /// Table name this outcome refers to.
    #[must_use]
    pub fn table(&self) -> &str {
        match self {
            TableOutcome::Migrated { table, .. }
            | TableOutcome::SkippedMissing { table }
            | TableOutcome::Failed { table, .. } => table,
        }
    }
}

/// Result of a conversion run.
#[derive(Debug, Serialize)]
pub struct MigrationResult {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Error text if the dump did not load cleanly.
    pub load_error: Option<String>,

    /// Tables in the allow-list.
    pub tables_total: usize,

    /// Tables fully transcoded.
    pub tables_migrated: usize,

    /// Tables absent from the dump.
    pub tables_skipped: usize,

    /// Tables that failed during transcoding.
    pub tables_failed: usize,

    /// Rows written to the output script.
    pub rows_written: usize,

    /// Per-table outcomes, in allow-list order.
    pub outcomes: Vec<TableOutcome>,

    /// Output script path.
    pub output: PathBuf,

    /// Suggested psql invocation to apply the script.
    pub apply_command: String,
}

impl MigrationResult {
    /// Serialize the result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the conversion pipeline over the fixed table allow-list.
pub struct Orchestrator {
    config: Config,
    tables: Vec<TableSpec>,
}

impl Orchestrator {
    /// Create an orchestrator over the built-in table allow-list.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tables: builtin_tables(),
        }
    }

    /// Replace the table allow-list.
    #[must_use]
    pub fn with_tables(mut self, tables: Vec<TableSpec>) -> Self {
        self.tables = tables;
        self
    }

    /// Convert the dump at `dump` into the output script.
    ///
    /// Per-table problems (missing table, transcoding failure) are collected
    /// as outcomes, never propagated; the run fails only on unreadable
    /// input, unwritable output, or a load error in strict mode.
    pub fn run(&self, dump: &Path) -> Result<MigrationResult> {
        let started_at = Utc::now();
        let timer = Instant::now();

        let loader = DumpLoader::new(self.config.strict);
        let (conn, load_report) = loader.load(dump)?;

        let mut scripts = Vec::new();
        let mut outcomes = Vec::new();
        for spec in &self.tables {
            info!("Processing table: {}", spec.name);
            match self.process_table(&conn, spec) {
                Ok(Some(script)) => {
                    outcomes.push(TableOutcome::Migrated {
                        table: script.table.clone(),
                        rows: script.row_count(),
                    });
                    scripts.push(script);
                }
                Ok(None) => {
                    warn!("Skipping table {} (not present in dump)", spec.name);
                    outcomes.push(TableOutcome::SkippedMissing {
                        table: spec.name.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Skipping table {}: {}", spec.name, e);
                    outcomes.push(TableOutcome::Failed {
                        table: spec.name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        emitter::write_script(&self.config.output, &scripts)?;
        let apply_command = emitter::apply_command(&self.config.target, &self.config.output);

        let completed_at = Utc::now();
        let duration_seconds = timer.elapsed().as_secs_f64();

        let mut tables_migrated = 0;
        let mut tables_skipped = 0;
        let mut tables_failed = 0;
        let mut rows_written = 0;
        for outcome in &outcomes {
            match outcome {
                TableOutcome::Migrated { rows, .. } => {
                    tables_migrated += 1;
                    rows_written += rows;
                }
                TableOutcome::SkippedMissing { .. } => tables_skipped += 1,
                TableOutcome::Failed { .. } => tables_failed += 1,
            }
        }

        let result = MigrationResult {
            started_at,
            completed_at,
            duration_seconds,
            load_error: load_report.error().map(|e| e.to_string()),
            tables_total: self.tables.len(),
            tables_migrated,
            tables_skipped,
            tables_failed,
            rows_written,
            outcomes,
            output: self.config.output.clone(),
            apply_command,
        };

        info!(
            "Conversion completed: {}/{} tables, {} rows in {:.2}s",
            result.tables_migrated, result.tables_total, result.rows_written, result.duration_seconds
        );

        Ok(result)
    }

    fn process_table(&self, conn: &Connection, spec: &TableSpec) -> Result<Option<TableScript>> {
        if !transcode::table_exists(conn, spec.name)? {
            return Ok(None);
        }
        transcode::transcode_table(conn, spec).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn run_over(dump: &str) -> (MigrationResult, String) {
        let mut dump_file = tempfile::NamedTempFile::new().unwrap();
        dump_file.write_all(dump.as_bytes()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.sql");
        let mut config = Config::default();
        config.output = output.clone();

        let result = Orchestrator::new(config).run(dump_file.path()).unwrap();
        let script = std::fs::read_to_string(&output).unwrap();
        (result, script)
    }

    #[test]
    fn test_two_row_table_end_to_end() {
        let (result, script) = run_over(
            "CREATE TABLE playlists (id TEXT PRIMARY KEY, name TEXT, video_ids TEXT, \
             is_watch_later INTEGER);\n\
             INSERT INTO playlists VALUES ('p1', 'Favorites', '[\"a\",\"b\"]', 1);\n\
             INSERT INTO playlists VALUES ('p2', NULL, '', 0);",
        );

        assert_eq!(result.tables_migrated, 1);
        assert_eq!(result.tables_skipped, 4);
        assert_eq!(result.rows_written, 2);
        assert!(result.load_error.is_none());

        let inserts: Vec<&str> = script
            .lines()
            .filter(|l| l.starts_with("INSERT INTO"))
            .collect();
        assert_eq!(inserts.len(), 2);
        for insert in &inserts {
            assert!(insert.ends_with("ON CONFLICT (\"id\") DO NOTHING;"));
        }
        assert!(inserts[0].contains("'{a,b}', TRUE"));
        assert!(inserts[1].contains("NULL, '{}', FALSE"));

        // Statements sit between the transaction markers
        let begin = script.find("BEGIN;").unwrap();
        let commit = script.find("COMMIT;").unwrap();
        let first = script.find("INSERT INTO").unwrap();
        assert!(begin < first && first < commit);
    }

    #[test]
    fn test_missing_tables_reported_not_fatal() {
        let (result, script) = run_over(
            "CREATE TABLE users (floatplane_user_id TEXT PRIMARY KEY, name TEXT);\n\
             CREATE TABLE qr_sessions (id TEXT PRIMARY KEY);\n\
             CREATE TABLE device_sessions (id TEXT PRIMARY KEY);\n\
             INSERT INTO users VALUES ('u1', 'Ada');",
        );

        assert_eq!(result.tables_migrated, 3);
        assert_eq!(result.tables_skipped, 2);
        assert_eq!(result.tables_failed, 0);

        let skipped: Vec<&str> = result
            .outcomes
            .iter()
            .filter(|o| matches!(o, TableOutcome::SkippedMissing { .. }))
            .map(|o| o.table())
            .collect();
        assert_eq!(skipped, vec!["playlists", "fp_posts"]);

        assert!(script.contains("\"users\""));
        assert!(!script.contains("\"playlists\""));
    }

    #[test]
    fn test_partial_load_surfaces_in_result() {
        let (result, script) = run_over(
            "CREATE TABLE users (floatplane_user_id TEXT PRIMARY KEY);\n\
             INSERT INTO users VALUES ('u1');\n\
             INSERT INTO missing VALUES (1);",
        );

        assert!(result.load_error.is_some());
        assert_eq!(result.tables_migrated, 1);
        assert!(script.contains("'u1'"));
    }

    #[test]
    fn test_outcomes_serialize_to_json() {
        let (result, _) = run_over("CREATE TABLE users (floatplane_user_id TEXT PRIMARY KEY);");
        let json = result.to_json().unwrap();
        assert!(json.contains("\"status\": \"migrated\""));
        assert!(json.contains("\"status\": \"skipped_missing\""));
        assert!(json.contains("\"apply_command\""));
    }

    #[test]
    fn test_users_conflict_key_in_output() {
        let (_, script) = run_over(
            "CREATE TABLE users (floatplane_user_id TEXT PRIMARY KEY, name TEXT);\n\
             INSERT INTO users VALUES ('u1', 'Ada');",
        );
        assert!(script.contains("ON CONFLICT (\"floatplane_user_id\") DO NOTHING;"));
    }
}
