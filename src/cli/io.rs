//! File and stdout handling for the CLI
//!
//! - Manifests and row files are UTF-8 JSON
//! - Output is a single JSON document on stdout

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON array of rows
pub fn read_rows(path: &Path) -> CliResult<Vec<Value>> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::data_error(format!("{}: {}", path.display(), e)))?;

    match serde_json::from_str(&content) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(_) => Err(CliError::data_error(format!(
            "{}: expected a JSON array of rows",
            path.display()
        ))),
        Err(e) => Err(CliError::data_error(format!("{}: {}", path.display(), e))),
    }
}

/// Write a JSON document to stdout
pub fn write_value(value: &Value, pretty: bool) -> CliResult<()> {
    let mut stdout = io::stdout();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
