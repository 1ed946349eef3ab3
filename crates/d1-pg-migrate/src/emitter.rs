//! Output script assembly and the operator-facing apply command.

use std::path::Path;

use tracing::info;

use crate::config::TargetConfig;
use crate::error::Result;
use crate::transcode::TableScript;

/// Comment line at the top of the generated script.
pub const SCRIPT_HEADER: &str = "-- PostgreSQL import script generated from D1 dump";

/// Render the full script: header, transaction framing, and all table
/// statements in the order given.
#[must_use]
pub fn render_script(tables: &[TableScript]) -> String {
    let mut script = String::new();
    script.push_str(SCRIPT_HEADER);
    script.push('\n');
    script.push_str("BEGIN;\n\n");
    for table in tables {
        for statement in &table.statements {
            script.push_str(statement);
            script.push('\n');
        }
    }
    script.push_str("\nCOMMIT;\n");
    script
}

/// Write the script to the output path, overwriting any prior content.
pub fn write_script(path: &Path, tables: &[TableScript]) -> Result<()> {
    std::fs::write(path, render_script(tables))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// The psql invocation that applies the generated script to the target.
#[must_use]
pub fn apply_command(target: &TargetConfig, output: &Path) -> String {
    format!(
        "psql -h {} -p {} -U {} -d {} -f {}",
        target.host,
        target.port,
        target.user,
        target.database,
        output.display()
    )
}
