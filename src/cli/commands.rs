//! CLI command implementations
//!
//! Each command loads a table manifest (catalog over JSON documents plus
//! table settings) and, where needed, a JSON array of rows.
//!
//! One-shot commands keep the logger at ERROR so stdout carries only the
//! result document; `serve` logs at INFO.

use std::path::Path;

use serde_json::Value;

use crate::config::TableManifest;
use crate::http::{HttpServerConfig, TableServer, TableState};
use crate::observability::{Logger, Severity};
use crate::query::MemoryQueryable;
use crate::table::DataTable;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_rows, write_value};

/// Table over JSON documents described by a manifest file.
pub fn load_table(manifest_path: &Path) -> CliResult<DataTable<Value, Value>> {
    let manifest = TableManifest::load(manifest_path)?;
    let catalog_config = manifest.catalog_config();
    let catalog = catalog_config.build()?;
    Ok(DataTable::new(
        catalog,
        catalog_config.projection(),
        manifest.settings,
    ))
}

/// Parse CLI arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query {
            manifest,
            data,
            query: raw,
            pretty,
        } => {
            Logger::set_min_severity(Severity::Error);
            write_value(&query(&manifest, &data, &raw)?, pretty)
        }
        Command::Config {
            manifest,
            url,
            method,
            pretty,
        } => {
            Logger::set_min_severity(Severity::Error);
            write_value(&config(&manifest, &url, &method)?, pretty)
        }
        Command::Distinct {
            manifest,
            data,
            column,
        } => {
            Logger::set_min_severity(Severity::Error);
            write_value(&distinct(&manifest, &data, &column)?, false)
        }
        Command::Serve {
            manifest,
            data,
            host,
            port,
        } => {
            Logger::set_min_severity(Severity::Info);
            serve(&manifest, &data, HttpServerConfig::new(host, port))
        }
    }
}

/// Answer one draw request against the rows in `data_path`.
pub fn query(manifest_path: &Path, data_path: &Path, raw: &str) -> CliResult<Value> {
    let table = load_table(manifest_path)?;
    let rows = read_rows(data_path)?;

    let response = match table.render_response(raw, MemoryQueryable::from(rows)) {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.to_value()?)
}

/// Client widget configuration for the manifest's table.
pub fn config(manifest_path: &Path, url: &str, method: &str) -> CliResult<Value> {
    let table = load_table(manifest_path)?;
    Ok(table.client_configuration(url, method).to_value()?)
}

/// Distinct text values of one column.
pub fn distinct(manifest_path: &Path, data_path: &Path, column: &str) -> CliResult<Value> {
    let table = load_table(manifest_path)?;
    let rows = read_rows(data_path)?;
    let values = table.distinct_column_values(column, MemoryQueryable::from(rows))?;
    Ok(Value::from(values))
}

/// Serve the table over HTTP until interrupted.
pub fn serve(manifest_path: &Path, data_path: &Path, http_config: HttpServerConfig) -> CliResult<()> {
    let table = load_table(manifest_path)?;
    let rows = read_rows(data_path)?;
    let server = TableServer::new(http_config, TableState::new(table, rows));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(server.start())?;

    Ok(())
}
