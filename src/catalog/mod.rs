//! # Column Catalog
//!
//! Server-declared, read-only whitelist of columns for one logical table.
//!
//! - Public names are unique within a catalog
//! - Storage and ordering paths are resolved into accessors when the catalog
//!   is built; an unknown path is a configuration error
//! - Requests never mutate catalog state; they work on their own copies

#[allow(clippy::module_inception)]
mod catalog;
mod column;
mod config;
mod entity;
mod errors;
mod overrides;

pub use catalog::{Catalog, CatalogBuilder, CatalogColumn};
pub use column::ColumnDescriptor;
pub use config::{CatalogConfig, ColumnConfig};
pub use entity::{cell_text, lookup_path, to_cell, Entity, FieldAccessor};
pub use errors::{CatalogError, CatalogResult};
pub use overrides::{SearchOverrides, SearchPredicate, SearchProvider, SearchScope};
