//! Row accessors
//!
//! A storage path is resolved into a typed accessor once, when the catalog is
//! built. Predicates and orderings then call the accessor per row instead of
//! re-walking the path.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

/// Reads one cell out of a row.
pub type FieldAccessor<E> = Arc<dyn Fn(&E) -> Value + Send + Sync>;

/// A row type that columns can be declared over.
pub trait Entity: Send + Sync + 'static {
    /// Resolve a storage path into an accessor. `None` means the path does not
    /// exist on this type, which makes any column using it a configuration error.
    fn accessor(path: &str) -> Option<FieldAccessor<Self>>
    where
        Self: Sized;

    /// Paths known up front, used by `CatalogBuilder::from_entity`.
    fn field_paths() -> &'static [&'static str] {
        &[]
    }
}

/// Converts a field into a cell value. Serialization failures become `null`.
pub fn to_cell<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Walks a dotted path through nested JSON objects. Missing segments yield `null`.
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// JSON documents are schemaless: every path resolves, missing cells read as `null`.
impl Entity for Value {
    fn accessor(path: &str) -> Option<FieldAccessor<Self>> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return None;
        }
        let path = path.to_string();
        Some(Arc::new(move |doc: &Value| {
            lookup_path(doc, &path).cloned().unwrap_or(Value::Null)
        }))
    }
}

/// Textual form of a cell for searching. `null` has no text and never matches.
pub fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Implements [`Entity`] for a struct by listing `"StoragePath" => field` pairs.
///
/// ```ignore
/// struct Person { id: u32, name: String }
/// datatables::impl_entity!(Person { "Id" => id, "Name" => name });
/// ```
#[macro_export]
macro_rules! impl_entity {
    ($ty:ty { $($path:literal => $field:ident),* $(,)? }) => {
        impl $crate::catalog::Entity for $ty {
            fn accessor(path: &str) -> Option<$crate::catalog::FieldAccessor<Self>> {
                match path {
                    $(
                        $path => Some(::std::sync::Arc::new(|row: &$ty| {
                            $crate::catalog::to_cell(&row.$field)
                        })),
                    )*
                    _ => None,
                }
            }

            fn field_paths() -> &'static [&'static str] {
                &[$($path),*]
            }
        }
    };
}
