//! Catalog declared as data
//!
//! Tables over JSON documents can be described in a file instead of code.
//! Predicate overrides and ordering expressions are code-only; a file may
//! still point ordering at another path with `order_by`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::catalog::Catalog;
use super::column::ColumnDescriptor;
use super::entity::lookup_path;
use super::errors::CatalogResult;

/// One column of a file-declared catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub public_name: String,

    pub storage_path: String,

    /// Field name on the projected row (default: the storage path)
    #[serde(default)]
    pub output_property: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default = "default_true")]
    pub searchable: bool,

    #[serde(default = "default_true")]
    pub orderable: bool,

    #[serde(default = "default_true")]
    pub search_case_insensitive: bool,

    #[serde(default)]
    pub order_case_insensitive: bool,

    #[serde(default)]
    pub search_regex: bool,

    /// Alternate ordering path
    #[serde(default)]
    pub order_by: Option<String>,

    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

fn default_true() -> bool {
    true
}

impl ColumnConfig {
    /// Minimal column: searchable and orderable, everything else default.
    pub fn new(public_name: impl Into<String>, storage_path: impl Into<String>) -> Self {
        Self {
            public_name: public_name.into(),
            storage_path: storage_path.into(),
            output_property: None,
            display_name: None,
            searchable: true,
            orderable: true,
            search_case_insensitive: true,
            order_case_insensitive: false,
            search_regex: false,
            order_by: None,
            metadata: BTreeMap::new(),
        }
    }

    fn output_name(&self) -> &str {
        self.output_property.as_deref().unwrap_or(&self.storage_path)
    }

    /// Descriptor over JSON documents.
    pub fn to_descriptor(&self) -> ColumnDescriptor<Value> {
        let mut descriptor = ColumnDescriptor::new(&self.public_name, &self.storage_path);
        descriptor.output_property = self.output_property.clone();
        descriptor.display_name = self.display_name.clone();
        descriptor.searchable = self.searchable;
        descriptor.orderable = self.orderable;
        descriptor.search_case_insensitive = self.search_case_insensitive;
        descriptor.order_case_insensitive = self.order_case_insensitive;
        descriptor.search_regex = self.search_regex;
        descriptor.order_property = self.order_by.clone();
        descriptor.metadata = self.metadata.clone();
        descriptor
    }
}

/// A catalog over JSON documents, as stored in a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub columns: Vec<ColumnConfig>,
}

impl CatalogConfig {
    pub fn new(columns: Vec<ColumnConfig>) -> Self {
        Self { columns }
    }

    /// Validate and resolve into a catalog.
    pub fn build(&self) -> CatalogResult<Catalog<Value>> {
        Catalog::new(self.columns.iter().map(ColumnConfig::to_descriptor).collect())
    }

    /// Row projection for file-declared tables: one output field per column,
    /// read from the column's storage path. Missing cells project as `null`.
    pub fn projection(&self) -> impl Fn(&Value) -> Value + Send + Sync + 'static {
        let fields: Vec<(String, String)> = self
            .columns
            .iter()
            .map(|c| (c.output_name().to_string(), c.storage_path.clone()))
            .collect();

        move |row: &Value| {
            let mut object = Map::with_capacity(fields.len());
            for (output, path) in &fields {
                let cell = lookup_path(row, path).cloned().unwrap_or(Value::Null);
                object.insert(output.clone(), cell);
            }
            Value::Object(object)
        }
    }
}
