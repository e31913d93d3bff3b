//! Serialization contract
//!
//! Relabels mapped rows at serialization time: a field whose name equals a
//! column's output property is emitted under the column's public name. Other
//! fields pass through unless the contract strips them.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::catalog::Catalog;

/// Output-property → public-name relabeling for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializationContract {
    renames: HashMap<String, String>,
    strip_unlisted: bool,
}

impl SerializationContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// One rename per catalog column.
    pub fn from_catalog<E>(catalog: &Catalog<E>) -> Self {
        let renames = catalog
            .iter()
            .map(|column| {
                let descriptor = column.descriptor();
                (descriptor.output_name().to_string(), descriptor.public_name.clone())
            })
            .collect();
        Self {
            renames,
            strip_unlisted: false,
        }
    }

    pub fn rename(mut self, output: impl Into<String>, public: impl Into<String>) -> Self {
        self.renames.insert(output.into(), public.into());
        self
    }

    /// Drop fields no column refers to.
    pub fn strip_unlisted(mut self, strip: bool) -> Self {
        self.strip_unlisted = strip;
        self
    }

    pub fn public_name(&self, output: &str) -> Option<&str> {
        self.renames.get(output).map(String::as_str)
    }

    /// Relabel one row. Rows that are not JSON objects are returned as is.
    pub fn relabel(&self, row: Value) -> Value {
        match row {
            Value::Object(fields) => {
                let mut relabeled = Map::with_capacity(fields.len());
                for (name, value) in fields {
                    match self.renames.get(&name) {
                        Some(public) => {
                            relabeled.insert(public.clone(), value);
                        }
                        None if !self.strip_unlisted => {
                            relabeled.entry(name).or_insert(value);
                        }
                        None => {}
                    }
                }
                Value::Object(relabeled)
            }
            other => other,
        }
    }
}
