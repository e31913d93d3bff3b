//! Table facade errors
//!
//! Error codes:
//! - DT_TABLE_UNKNOWN_COLUMN
//! - DT_TABLE_SOURCE

use thiserror::Error;

/// Errors of table-level lookups. `S` is the data source's own error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError<S> {
    /// Column name not present in the catalog
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Error raised by the data source, unchanged
    #[error("Data source error: {0}")]
    Source(S),
}

impl<S> TableError<S> {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TableError::UnknownColumn(_) => "DT_TABLE_UNKNOWN_COLUMN",
            TableError::Source(_) => "DT_TABLE_SOURCE",
        }
    }

    /// The source error, if this is one.
    pub fn into_source(self) -> Option<S> {
        match self {
            TableError::Source(source) => Some(source),
            TableError::UnknownColumn(_) => None,
        }
    }
}
