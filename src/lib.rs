//! datatables - server-side processing for DataTables-style table widgets
//!
//! Translates the widget's flat request encoding into one filter predicate,
//! one ordering plan and an offset page over an injected data source, and
//! packages the result with the counters the widget needs.
//!
//! raw query string → [`request`] → [`query`] → [`response`]

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod http;
pub mod observability;
pub mod query;
pub mod request;
pub mod response;
pub mod table;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, ColumnDescriptor, Entity};
pub use config::{TableConfig, TableManifest};
pub use query::{MemoryQueryable, PagedList, Queryable};
pub use request::{ParsedRequest, RequestParams};
pub use response::{DataTablesResponse, SerializationContract};
pub use table::{DataTable, TableError};
