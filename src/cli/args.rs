//! CLI argument definitions using clap
//!
//! Commands:
//! - datatables query --manifest <path> --data <path> --query <qs>
//! - datatables config --manifest <path> --url <url>
//! - datatables distinct --manifest <path> --data <path> --column <name>
//! - datatables serve --manifest <path> --data <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Server-side processing for DataTables-style table widgets
#[derive(Parser, Debug)]
#[command(name = "datatables")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer one draw request and print the response
    Query {
        /// Path to the table manifest
        #[arg(long, default_value = "./table.json")]
        manifest: PathBuf,

        /// Path to a JSON array of rows
        #[arg(long)]
        data: PathBuf,

        /// Raw request query string
        #[arg(long, default_value = "")]
        query: String,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the client widget configuration
    Config {
        /// Path to the table manifest
        #[arg(long, default_value = "./table.json")]
        manifest: PathBuf,

        /// URL the widget sends draw requests to
        #[arg(long, default_value = "/")]
        url: String,

        /// HTTP method for draw requests
        #[arg(long, default_value = "POST")]
        method: String,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the distinct values of one column
    Distinct {
        /// Path to the table manifest
        #[arg(long, default_value = "./table.json")]
        manifest: PathBuf,

        /// Path to a JSON array of rows
        #[arg(long)]
        data: PathBuf,

        /// Public column name
        #[arg(long)]
        column: String,
    },

    /// Serve the table over HTTP
    Serve {
        /// Path to the table manifest
        #[arg(long, default_value = "./table.json")]
        manifest: PathBuf,

        /// Path to a JSON array of rows
        #[arg(long)]
        data: PathBuf,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8484)]
        port: u16,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
