//! Column descriptors
//!
//! A descriptor is the server's declaration of one column: its public identity,
//! where the value lives on the entity, what the client may do with it, and
//! optional overrides for searching and ordering.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::entity::FieldAccessor;
use super::overrides::{SearchOverrides, SearchPredicate, SearchProvider};

/// Declared column. Immutable once handed to a catalog.
pub struct ColumnDescriptor<E> {
    /// Wire and output identity
    pub public_name: String,
    /// Title shown by the widget; defaults to the public name
    pub display_name: Option<String>,
    /// Field name on the mapped view row; defaults to the storage path
    pub output_property: Option<String>,
    /// Path on the entity used for searching and (by default) ordering
    pub storage_path: String,
    pub searchable: bool,
    pub orderable: bool,
    /// On by default; see [`ColumnDescriptor::search_case_sensitive`]
    pub search_case_insensitive: bool,
    pub order_case_insensitive: bool,
    /// Server-side opt-in for regex search on this column
    pub search_regex: bool,
    pub overrides: SearchOverrides<E>,
    /// Alternate ordering value computed from the row
    pub order_expression: Option<FieldAccessor<E>>,
    /// Alternate ordering path on the entity
    pub order_property: Option<String>,
    /// Opaque options passed through to the client configuration
    pub metadata: BTreeMap<String, Value>,
}

impl<E> ColumnDescriptor<E> {
    /// New column; not searchable, not orderable until enabled. Searches
    /// ignore case unless the column opts out.
    pub fn new(public_name: impl Into<String>, storage_path: impl Into<String>) -> Self {
        Self {
            public_name: public_name.into(),
            display_name: None,
            output_property: None,
            storage_path: storage_path.into(),
            searchable: false,
            orderable: false,
            search_case_insensitive: true,
            order_case_insensitive: false,
            search_regex: false,
            overrides: SearchOverrides::default(),
            order_expression: None,
            order_property: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn orderable(mut self) -> Self {
        self.orderable = true;
        self
    }

    /// Searchable and orderable.
    pub fn sortable_searchable(self) -> Self {
        self.searchable().orderable()
    }

    pub fn search_case_insensitive(mut self) -> Self {
        self.search_case_insensitive = true;
        self
    }

    /// Match search text with exact case. Clients may still relax it per request.
    pub fn search_case_sensitive(mut self) -> Self {
        self.search_case_insensitive = false;
        self
    }

    pub fn order_case_insensitive(mut self) -> Self {
        self.order_case_insensitive = true;
        self
    }

    /// Case-insensitive searching and ordering.
    pub fn case_insensitive(self) -> Self {
        self.search_case_insensitive().order_case_insensitive()
    }

    /// Allow clients to request regex search on this column.
    pub fn allow_regex(mut self) -> Self {
        self.search_regex = true;
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn output_property(mut self, name: impl Into<String>) -> Self {
        self.output_property = Some(name.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Static predicate used for both global and column search.
    pub fn search_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &str) -> bool + Send + Sync + 'static,
    {
        self.overrides.search_predicate = Some(Arc::new(predicate));
        self
    }

    /// Provider used for both global and column search.
    pub fn search_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&str) -> Option<SearchPredicate<E>> + Send + Sync + 'static,
    {
        self.overrides.search_provider = Some(Arc::new(provider) as SearchProvider<E>);
        self
    }

    pub fn global_search_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &str) -> bool + Send + Sync + 'static,
    {
        self.overrides.global_predicate = Some(Arc::new(predicate));
        self
    }

    pub fn global_search_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&str) -> Option<SearchPredicate<E>> + Send + Sync + 'static,
    {
        self.overrides.global_provider = Some(Arc::new(provider) as SearchProvider<E>);
        self
    }

    pub fn column_search_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &str) -> bool + Send + Sync + 'static,
    {
        self.overrides.column_predicate = Some(Arc::new(predicate));
        self
    }

    pub fn column_search_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn(&str) -> Option<SearchPredicate<E>> + Send + Sync + 'static,
    {
        self.overrides.column_provider = Some(Arc::new(provider) as SearchProvider<E>);
        self
    }

    /// Order by a computed value instead of the storage path.
    pub fn order_by_expression<F>(mut self, expression: F) -> Self
    where
        F: Fn(&E) -> Value + Send + Sync + 'static,
    {
        self.order_expression = Some(Arc::new(expression));
        self
    }

    /// Order by another entity path instead of the storage path.
    pub fn order_by_property(mut self, path: impl Into<String>) -> Self {
        self.order_property = Some(path.into());
        self
    }

    /// Title for the widget.
    pub fn title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.public_name)
    }

    /// Field name on the mapped view row.
    pub fn output_name(&self) -> &str {
        self.output_property.as_deref().unwrap_or(&self.storage_path)
    }
}

impl<E> Clone for ColumnDescriptor<E> {
    fn clone(&self) -> Self {
        Self {
            public_name: self.public_name.clone(),
            display_name: self.display_name.clone(),
            output_property: self.output_property.clone(),
            storage_path: self.storage_path.clone(),
            searchable: self.searchable,
            orderable: self.orderable,
            search_case_insensitive: self.search_case_insensitive,
            order_case_insensitive: self.order_case_insensitive,
            search_regex: self.search_regex,
            overrides: self.overrides.clone(),
            order_expression: self.order_expression.clone(),
            order_property: self.order_property.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<E> fmt::Debug for ColumnDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("public_name", &self.public_name)
            .field("storage_path", &self.storage_path)
            .field("output_property", &self.output_name())
            .field("searchable", &self.searchable)
            .field("orderable", &self.orderable)
            .field("search_case_insensitive", &self.search_case_insensitive)
            .field("order_case_insensitive", &self.order_case_insensitive)
            .field("search_regex", &self.search_regex)
            .field("overrides", &self.overrides)
            .field("order_expression", &self.order_expression.is_some())
            .field("order_property", &self.order_property)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_closed() {
        let column = ColumnDescriptor::<Value>::new("name", "Name");
        assert!(!column.searchable);
        assert!(!column.orderable);
        assert!(!column.search_regex);
        assert!(column.search_case_insensitive);
        assert!(!column.order_case_insensitive);
        assert!(column.overrides.is_empty());
        assert_eq!(column.title(), "name");
        assert_eq!(column.output_name(), "Name");
    }

    #[test]
    fn test_builder_sets_flags() {
        let column = ColumnDescriptor::<Value>::new("name", "Name")
            .sortable_searchable()
            .case_insensitive()
            .allow_regex()
            .display_name("Full name")
            .output_property("FullName")
            .metadata("className", json!("dt-left"));

        assert!(column.searchable && column.orderable);
        assert!(column.search_case_insensitive && column.order_case_insensitive);
        assert!(column.search_regex);
        assert_eq!(column.title(), "Full name");
        assert_eq!(column.output_name(), "FullName");
        assert_eq!(column.metadata["className"], json!("dt-left"));
    }

    #[test]
    fn test_search_case_sensitive_opt_out() {
        let column = ColumnDescriptor::<Value>::new("name", "Name")
            .searchable()
            .search_case_sensitive();
        assert!(!column.search_case_insensitive);

        let column = column.case_insensitive();
        assert!(column.search_case_insensitive && column.order_case_insensitive);
    }

    #[test]
    fn test_clone_shares_overrides() {
        let column = ColumnDescriptor::<Value>::new("name", "Name")
            .search_predicate(|row, text| row["Name"] == text);
        let copy = column.clone();

        let predicate = copy.overrides.search_predicate.unwrap();
        assert!(predicate(&json!({"Name": "Anna"}), "Anna"));
    }
}
