//! Client widget configuration
//!
//! JSON object the widget is initialized with: server-side mode, where to
//! send draw requests and the column list. Only the data is produced here;
//! embedding it into a page is up to the application.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Catalog;

/// Where the widget sends its requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AjaxConfiguration {
    pub url: String,
    #[serde(rename = "type")]
    pub method: String,
}

/// One column as the widget sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientColumn {
    pub data: String,
    pub name: String,
    pub title: String,
    pub searchable: bool,
    pub orderable: bool,
    /// Column metadata, flattened into the column object
    #[serde(flatten)]
    pub additional_options: BTreeMap<String, Value>,
}

/// Widget initialization options for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfiguration {
    pub server_side: bool,
    pub ajax: AjaxConfiguration,
    pub columns: Vec<ClientColumn>,
    /// Table-level options, flattened into the top-level object
    #[serde(flatten)]
    pub additional_options: BTreeMap<String, Value>,
}

impl ClientConfiguration {
    /// Configuration listing every catalog column under its public name.
    pub fn from_catalog<E>(
        catalog: &Catalog<E>,
        url: impl Into<String>,
        method: impl Into<String>,
        additional_options: &BTreeMap<String, Value>,
    ) -> Self {
        let columns = catalog
            .iter()
            .map(|column| {
                let descriptor = column.descriptor();
                ClientColumn {
                    data: descriptor.public_name.clone(),
                    name: descriptor.public_name.clone(),
                    title: descriptor.title().to_string(),
                    searchable: descriptor.searchable,
                    orderable: descriptor.orderable,
                    additional_options: descriptor.metadata.clone(),
                }
            })
            .collect();

        Self {
            server_side: true,
            ajax: AjaxConfiguration {
                url: url.into(),
                method: method.into(),
            },
            columns,
            additional_options: additional_options.clone(),
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
