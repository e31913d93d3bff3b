//! Table configuration
//!
//! One immutable value per table, passed explicitly at construction. There
//! are no process-wide mutable defaults.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{CatalogConfig, CatalogError, CatalogResult, ColumnConfig};
use crate::observability::{log_event_with_fields, Event};
use crate::request::DEFAULT_PAGE_SIZE;

/// Per-table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Page size when the request has no usable `length` (default: 15)
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Report the unfiltered source count as `recordsTotal` (default: false)
    #[serde(default)]
    pub count_unfiltered_total: bool,

    /// Drop row fields no column refers to (default: false)
    #[serde(default)]
    pub strip_unlisted_fields: bool,

    /// Hand request dumps to the diagnostic hook, when one is set (default: true)
    #[serde(default = "default_log_requests")]
    pub log_requests: bool,

    /// Extra options merged into the client configuration
    #[serde(default)]
    pub additional_options: BTreeMap<String, Value>,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_log_requests() -> bool {
    true
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            count_unfiltered_total: false,
            strip_unlisted_fields: false,
            log_requests: default_log_requests(),
            additional_options: BTreeMap::new(),
        }
    }
}

impl TableConfig {
    pub fn with_page_size(default_page_size: i64) -> Self {
        Self {
            default_page_size,
            ..Default::default()
        }
    }
}

/// A table over JSON documents described in one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableManifest {
    #[serde(default)]
    pub settings: TableConfig,

    pub columns: Vec<ColumnConfig>,
}

impl TableManifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::MalformedConfig(format!("{}: {}", path.display(), e))
        })?;

        let manifest = Self::from_json(&content).map_err(|e| match e {
            CatalogError::MalformedConfig(reason) => {
                CatalogError::MalformedConfig(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })?;

        let path_text = path.display().to_string();
        let columns = manifest.columns.len().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("columns", columns.as_str()), ("path", path_text.as_str())],
        );
        Ok(manifest)
    }

    pub fn from_json(content: &str) -> CatalogResult<Self> {
        serde_json::from_str(content).map_err(|e| CatalogError::MalformedConfig(e.to_string()))
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig::new(self.columns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.default_page_size, 15);
        assert!(!config.count_unfiltered_total);
        assert!(!config.strip_unlisted_fields);
        assert!(config.log_requests);
    }

    #[test]
    fn test_partial_settings_take_defaults() {
        let config: TableConfig =
            serde_json::from_value(json!({"count_unfiltered_total": true})).unwrap();
        assert!(config.count_unfiltered_total);
        assert_eq!(config.default_page_size, 15);
        assert!(config.log_requests);
    }

    #[test]
    fn test_manifest_from_json() {
        let manifest = TableManifest::from_json(
            r#"{
                "settings": {"default_page_size": 25, "additional_options": {"paging": true}},
                "columns": [{"public_name": "id", "storage_path": "Id"}]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.settings.default_page_size, 25);
        assert_eq!(manifest.settings.additional_options["paging"], json!(true));
        assert_eq!(manifest.catalog_config().columns.len(), 1);
    }

    #[test]
    fn test_manifest_without_settings() {
        let manifest =
            TableManifest::from_json(r#"{"columns": []}"#).unwrap();
        assert_eq!(manifest.settings, TableConfig::default());
    }

    #[test]
    fn test_malformed_manifest() {
        let err = TableManifest::from_json(r#"{"settings": {}}"#).unwrap_err();
        assert_eq!(err.code(), "DT_CATALOG_MALFORMED_CONFIG");
    }

    #[test]
    fn test_missing_file() {
        let err = TableManifest::load(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedConfig(ref reason) if reason.contains("manifest.json")));
    }
}
