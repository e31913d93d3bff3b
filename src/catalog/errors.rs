//! Catalog configuration errors
//!
//! Error codes:
//! - DT_CATALOG_EMPTY_NAME
//! - DT_CATALOG_DUPLICATE_COLUMN
//! - DT_CATALOG_UNKNOWN_PATH
//! - DT_CATALOG_UNKNOWN_ORDER_PATH
//! - DT_CATALOG_MALFORMED_CONFIG
//!
//! All of them are raised while the catalog is built and are not recoverable
//! at request time: the integrating application has to fix its declaration.

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog declaration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A column was declared without a public name
    #[error("Column declared with an empty public name (storage path '{0}')")]
    EmptyPublicName(String),

    /// Two columns share one public name
    #[error("Duplicate public column name: {0}")]
    DuplicatePublicName(String),

    /// Storage path does not exist on the entity type
    #[error("Column '{column}': storage path '{path}' does not exist on the entity")]
    UnknownStoragePath { column: String, path: String },

    /// Alternate ordering path does not exist on the entity type
    #[error("Column '{column}': ordering path '{path}' does not exist on the entity")]
    UnknownOrderPath { column: String, path: String },

    /// Catalog description could not be read
    #[error("Malformed catalog configuration: {0}")]
    MalformedConfig(String),
}

impl CatalogError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::EmptyPublicName(_) => "DT_CATALOG_EMPTY_NAME",
            CatalogError::DuplicatePublicName(_) => "DT_CATALOG_DUPLICATE_COLUMN",
            CatalogError::UnknownStoragePath { .. } => "DT_CATALOG_UNKNOWN_PATH",
            CatalogError::UnknownOrderPath { .. } => "DT_CATALOG_UNKNOWN_ORDER_PATH",
            CatalogError::MalformedConfig(_) => "DT_CATALOG_MALFORMED_CONFIG",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CatalogError::DuplicatePublicName("id".into()).code(),
            "DT_CATALOG_DUPLICATE_COLUMN"
        );
        assert_eq!(
            CatalogError::UnknownStoragePath {
                column: "name".into(),
                path: "Nmae".into()
            }
            .code(),
            "DT_CATALOG_UNKNOWN_PATH"
        );
    }

    #[test]
    fn test_error_display_names_the_column() {
        let err = CatalogError::UnknownOrderPath {
            column: "city".into(),
            path: "Location.Cty".into(),
        };
        let display = err.to_string();
        assert!(display.contains("city"));
        assert!(display.contains("Location.Cty"));
    }
}
