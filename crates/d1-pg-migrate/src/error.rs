//! Error types for the conversion library.

use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The dump failed to load cleanly and strict mode is enabled
    #[error("Dump load failed: {0}")]
    DumpLoad(String),

    /// Ephemeral store query or execution error
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Transcoding failed for a specific table
    #[error("Transcoding failed for table {table}: {message}")]
    Transcode { table: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create a Transcode error
    pub fn transcode(table: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Transcode {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) | MigrateError::Yaml(_) | MigrateError::Json(_) => 1,
            MigrateError::DumpLoad(_) => 2,
            MigrateError::Transcode { .. } => 3,
            MigrateError::Store(_) => 4,
            MigrateError::Io(_) => 7,
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
