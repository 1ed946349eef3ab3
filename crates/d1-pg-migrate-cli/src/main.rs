//! d1-pg-migrate CLI - D1 (SQLite) dump to PostgreSQL import script converter.

use clap::Parser;
use d1_pg_migrate::{Config, MigrateError, Orchestrator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "d1-pg-migrate")]
#[command(about = "Convert a Cloudflare D1 (SQLite) dump into a PostgreSQL import script")]
#[command(version)]
struct Cli {
    /// Path to the D1 dump file (SQLite-dialect SQL)
    dump: PathBuf,

    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output script path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Abort if the dump does not load cleanly
    #[arg(long)]
    strict: bool,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(MigrateError::Config)?;

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Apply overrides
    if let Some(output) = cli.output {
        config.output = output;
    }
    if cli.strict {
        config.strict = true;
    }
    config.validate()?;

    let orchestrator = Orchestrator::new(config);
    let result = orchestrator.run(&cli.dump)?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        println!("\nConversion completed!");
        println!("  Tables: {}/{}", result.tables_migrated, result.tables_total);
        if result.tables_skipped > 0 {
            println!("  Skipped (missing from dump): {}", result.tables_skipped);
        }
        if result.tables_failed > 0 {
            println!("  Failed: {}", result.tables_failed);
        }
        if let Some(ref err) = result.load_error {
            println!("  Dump loaded partially: {}", err);
        }
        println!("  Rows: {}", result.rows_written);
        println!("  Duration: {:.2}s", result.duration_seconds);
        println!("  Output: {}", result.output.display());
        println!("\nApply with: {}", result.apply_command);
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}
