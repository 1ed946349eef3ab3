//! Per-table row transcoding into PostgreSQL insert statements.

use rusqlite::Connection;
use tracing::debug;

use crate::catalog::TableSpec;
use crate::error::Result;
use crate::literal;
use crate::value::SqlValue;

/// Quote a PostgreSQL identifier.
///
/// Escapes double quotes by doubling them and wraps in double quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Statements generated for one table, in row order.
#[derive(Debug, Clone)]
pub struct TableScript {
    /// Table name.
    pub table: String,

    /// One insert statement per row.
    pub statements: Vec<String>,
}

impl TableScript {
    /// Number of rows transcoded.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.statements.len()
    }
}

/// Check whether a table exists in the loaded store.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?;
    Ok(stmt.exists([name])?)
}

/// Read all rows of a table and render one insert statement per row.
///
/// Each statement names all columns (quoted as identifiers) and ends in the
/// table's conflict clause, so the generated script is safe to re-run
/// against a target that already contains some of the rows.
pub fn transcode_table(conn: &Connection, spec: &TableSpec) -> Result<TableScript> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(spec.name)))?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|c| c.to_string())
        .collect();

    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let conflict_clause = format!("ON CONFLICT ({}) DO NOTHING", quote_ident(spec.conflict_key));

    let mut statements = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            let value = SqlValue::from(row.get_ref(idx)?);
            values.push(match spec.rule_for(column) {
                Some(rule) => literal::apply_rule(rule, &value),
                None => literal::generic_literal(&value),
            });
        }
        statements.push(format!(
            "INSERT INTO {} ({}) VALUES ({}) {};",
            quote_ident(spec.name),
            column_list,
            values.join(", "),
            conflict_clause,
        ));
    }

    debug!("Transcoded {} rows from {}", statements.len(), spec.name);
    Ok(TableScript {
        table: spec.name.to_string(),
        statements,
    })
}
