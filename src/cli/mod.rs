//! CLI module
//!
//! Provides command-line interface for:
//! - query: answer one draw request from files
//! - config: print the client widget configuration
//! - distinct: list the distinct values of one column
//! - serve: expose the table over HTTP

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{config, distinct, load_table, query, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_rows, write_value};
