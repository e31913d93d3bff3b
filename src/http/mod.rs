//! # HTTP surface
//!
//! Thin axum wrapper exposing one [`DataTable`](crate::table::DataTable)
//! over in-memory rows. Request handling is entirely delegated to the table.

mod config;
mod errors;
mod server;

pub use config::HttpServerConfig;
pub use errors::{ErrorResponse, HttpError, HttpResult};
pub use server::{table_routes, TableServer, TableState};
