//! Configuration loading and validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// Root configuration structure.
///
/// All fields have working defaults, so the tool runs without a config file;
/// a YAML file (and CLI overrides on top of it) adjusts the output path,
/// strictness, and the target connection used for the suggested apply command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output script path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Abort on dump load errors instead of continuing with partial state.
    #[serde(default)]
    pub strict: bool,

    /// Target connection settings for the suggested psql command.
    #[serde(default)]
    pub target: TargetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            strict: false,
            target: TargetConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.output.as_os_str().is_empty() {
            return Err(MigrateError::Config(
                "output path cannot be empty".to_string(),
            ));
        }
        if self.target.host.is_empty() {
            return Err(MigrateError::Config(
                "target host cannot be empty".to_string(),
            ));
        }
        if self.target.port == 0 {
            return Err(MigrateError::Config("target port cannot be 0".to_string()));
        }
        if self.target.user.is_empty() {
            return Err(MigrateError::Config(
                "target user cannot be empty".to_string(),
            ));
        }
        if self.target.database.is_empty() {
            return Err(MigrateError::Config(
                "target database cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Target database (PostgreSQL) connection settings.
///
/// The tool never connects to the target itself; these only shape the
/// operator-facing psql command printed after a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Database host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port (default: 5432).
    #[serde(default = "default_pg_port")]
    pub port: u16,

    /// Username.
    #[serde(default = "default_user")]
    pub user: String,

    /// Database name.
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_pg_port(),
            user: default_user(),
            database: default_database(),
        }
    }
}

// Default value functions for serde
fn default_output() -> PathBuf {
    PathBuf::from("postgres_import.sql")
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_pg_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "floatnative".to_string()
}
