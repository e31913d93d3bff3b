//! Column catalog
//!
//! The server-declared whitelist for one logical table. Building a catalog
//! validates the declaration and resolves every path into an accessor, so a
//! bad declaration fails before the first request is served.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::column::ColumnDescriptor;
use super::entity::{Entity, FieldAccessor};
use super::errors::{CatalogError, CatalogResult};
use crate::observability::{log_event_with_fields, Event};

/// A declared column with its paths resolved.
pub struct CatalogColumn<E> {
    descriptor: ColumnDescriptor<E>,
    position: usize,
    accessor: FieldAccessor<E>,
    order_accessor: FieldAccessor<E>,
}

impl<E> CatalogColumn<E> {
    pub fn descriptor(&self) -> &ColumnDescriptor<E> {
        &self.descriptor
    }

    pub fn public_name(&self) -> &str {
        &self.descriptor.public_name
    }

    /// Declaration order within the catalog.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Cell at the storage path.
    pub fn value(&self, row: &E) -> Value {
        (self.accessor)(row)
    }

    /// Accessor for the storage path.
    pub fn accessor(&self) -> &FieldAccessor<E> {
        &self.accessor
    }

    /// Ordering target: expression, else alternate property, else storage path.
    pub fn order_accessor(&self) -> &FieldAccessor<E> {
        &self.order_accessor
    }

    /// Label of the ordering target, used in query descriptions.
    pub fn order_label(&self) -> String {
        if self.descriptor.order_expression.is_some() {
            format!("{}(expr)", self.descriptor.public_name)
        } else {
            self.descriptor
                .order_property
                .clone()
                .unwrap_or_else(|| self.descriptor.storage_path.clone())
        }
    }
}

impl<E> fmt::Debug for CatalogColumn<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogColumn")
            .field("position", &self.position)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Immutable, validated set of columns for one table.
pub struct Catalog<E> {
    columns: Vec<Arc<CatalogColumn<E>>>,
    by_name: HashMap<String, usize>,
}

impl<E: Entity> Catalog<E> {
    /// Validate and resolve a list of descriptors.
    pub fn new(descriptors: Vec<ColumnDescriptor<E>>) -> CatalogResult<Self> {
        Self::resolve(descriptors).inspect_err(|err| {
            let reason = err.to_string();
            log_event_with_fields(
                Event::CatalogRejected,
                &[("code", err.code()), ("reason", reason.as_str())],
            );
        })
    }

    fn resolve(descriptors: Vec<ColumnDescriptor<E>>) -> CatalogResult<Self> {
        let mut columns = Vec::with_capacity(descriptors.len());
        let mut by_name = HashMap::with_capacity(descriptors.len());

        for (position, descriptor) in descriptors.into_iter().enumerate() {
            if descriptor.public_name.is_empty() {
                return Err(CatalogError::EmptyPublicName(descriptor.storage_path));
            }
            if by_name.contains_key(&descriptor.public_name) {
                return Err(CatalogError::DuplicatePublicName(descriptor.public_name));
            }

            let accessor = E::accessor(&descriptor.storage_path).ok_or_else(|| {
                CatalogError::UnknownStoragePath {
                    column: descriptor.public_name.clone(),
                    path: descriptor.storage_path.clone(),
                }
            })?;

            let order_accessor = match (&descriptor.order_expression, &descriptor.order_property) {
                (Some(expression), _) => Arc::clone(expression),
                (None, Some(path)) => {
                    E::accessor(path).ok_or_else(|| CatalogError::UnknownOrderPath {
                        column: descriptor.public_name.clone(),
                        path: path.clone(),
                    })?
                }
                (None, None) => Arc::clone(&accessor),
            };

            by_name.insert(descriptor.public_name.clone(), position);
            columns.push(Arc::new(CatalogColumn {
                descriptor,
                position,
                accessor,
                order_accessor,
            }));
        }

        Ok(Self { columns, by_name })
    }

    /// Start a builder.
    pub fn builder() -> CatalogBuilder<E> {
        CatalogBuilder::new()
    }
}

impl<E> Catalog<E> {
    /// Look up a column by public name.
    pub fn get(&self, public_name: &str) -> Option<&Arc<CatalogColumn<E>>> {
        self.by_name.get(public_name).map(|&i| &self.columns[i])
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Arc<CatalogColumn<E>>] {
        &self.columns
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CatalogColumn<E>>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<E> fmt::Debug for Catalog<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.columns.iter().map(|c| c.public_name()))
            .finish()
    }
}

/// Incremental catalog declaration.
pub struct CatalogBuilder<E> {
    descriptors: Vec<ColumnDescriptor<E>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> CatalogBuilder<E> {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// One searchable, orderable column per known entity path, named in camelCase.
    pub fn from_entity() -> Self {
        E::field_paths()
            .iter()
            .fold(Self::new(), |builder, path| {
                builder.column(ColumnDescriptor::new(camel_case(path), *path).sortable_searchable())
            })
    }

    pub fn column(mut self, descriptor: ColumnDescriptor<E>) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adjust an already declared column, e.g. after `from_entity`.
    pub fn configure<F>(mut self, public_name: &str, f: F) -> Self
    where
        F: FnOnce(ColumnDescriptor<E>) -> ColumnDescriptor<E>,
    {
        if let Some(slot) = self
            .descriptors
            .iter_mut()
            .find(|d| d.public_name == public_name)
        {
            let placeholder = ColumnDescriptor::new(String::new(), String::new());
            let current = std::mem::replace(slot, placeholder);
            *slot = f(current);
        }
        self
    }

    pub fn build(self) -> CatalogResult<Catalog<E>> {
        Catalog::new(self.descriptors)
    }
}

impl<E: Entity> Default for CatalogBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// `Location.CityName` -> `location.cityName`, `Id` -> `id`
fn camel_case(path: &str) -> String {
    path.split('.')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
