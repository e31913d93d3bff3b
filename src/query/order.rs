//! Order composer
//!
//! Orders by the request columns that carry an ordering, ascending by sort
//! slot. The first key is the primary sort; every later key only breaks ties
//! left by the keys before it. Non-orderable columns never contribute.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::catalog::FieldAccessor;
use crate::request::{ParsedRequest, SortDirection};

/// One ordering key.
pub struct OrderKey<E> {
    accessor: FieldAccessor<E>,
    pub direction: SortDirection,
    /// Compare text keys lower-cased
    pub case_insensitive: bool,
    pub label: String,
}

impl<E> OrderKey<E> {
    pub fn new(
        label: impl Into<String>,
        accessor: FieldAccessor<E>,
        direction: SortDirection,
        case_insensitive: bool,
    ) -> Self {
        Self {
            accessor,
            direction,
            case_insensitive,
            label: label.into(),
        }
    }

    pub fn key(&self, row: &E) -> Value {
        (self.accessor)(row)
    }

    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        self.compare_keys(&self.key(a), &self.key(b))
    }

    /// Compare two already extracted keys, honoring direction.
    pub fn compare_keys(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = compare_values(a, b, self.case_insensitive);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn describe(&self) -> String {
        if self.case_insensitive {
            format!("lower({}) {}", self.label, self.direction.as_str())
        } else {
            format!("{} {}", self.label, self.direction.as_str())
        }
    }
}

impl<E> Clone for OrderKey<E> {
    fn clone(&self) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            direction: self.direction,
            case_insensitive: self.case_insensitive,
            label: self.label.clone(),
        }
    }
}

impl<E> fmt::Debug for OrderKey<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OrderKey").field(&self.describe()).finish()
    }
}

/// Ordered list of keys; empty means "keep source order".
pub struct OrderPlan<E> {
    keys: Vec<OrderKey<E>>,
}

impl<E> OrderPlan<E> {
    pub fn new(keys: Vec<OrderKey<E>>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &[OrderKey<E>] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<OrderKey<E>> {
        self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Lexicographic comparison over all keys.
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        self.keys
            .iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    pub fn describe(&self) -> String {
        self.keys
            .iter()
            .map(OrderKey::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<E> Clone for OrderPlan<E> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
        }
    }
}

impl<E> fmt::Debug for OrderPlan<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys.iter()).finish()
    }
}

/// Compose the ordering plan for `request`.
pub fn compose_order<E, V>(request: &ParsedRequest<E, V>) -> OrderPlan<E> {
    let mut ordered: Vec<_> = request
        .columns
        .iter()
        .filter(|c| c.orderable)
        .filter_map(|c| c.ordering.map(|ordering| (ordering, c)))
        .collect();
    ordered.sort_by_key(|(ordering, _)| ordering.index);

    let keys = ordered
        .into_iter()
        .map(|(ordering, column)| {
            let catalog_column = column.catalog_column();
            OrderKey::new(
                catalog_column.order_label(),
                Arc::clone(catalog_column.order_accessor()),
                ordering.direction,
                column.order_case_insensitive,
            )
        })
        .collect();

    OrderPlan::new(keys)
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over cells: null < bool < number < string < array < object.
///
/// Numbers compare numerically; strings lexicographically, lower-cased first
/// when `case_insensitive` is set (text keys only).
pub fn compare_values(a: &Value, b: &Value, case_insensitive: bool) -> Ordering {
    let (a_rank, b_rank) = (type_rank(a), type_rank(b));
    if a_rank != b_rank {
        return a_rank.cmp(&b_rank);
    }

    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                a.cmp(&b)
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                a.cmp(&b)
            } else {
                let a = a.as_f64().unwrap_or(0.0);
                let b = b.as_f64().unwrap_or(0.0);
                a.total_cmp(&b)
            }
        }
        (Value::String(a), Value::String(b)) => {
            if case_insensitive {
                a.to_lowercase().cmp(&b.to_lowercase())
            } else {
                a.cmp(b)
            }
        }
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| compare_values(x, y, case_insensitive))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(_), Value::Object(_)) => a.to_string().cmp(&b.to_string()),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, ColumnDescriptor};
    use crate::request::{RequestParams, WireDecoder};
    use serde_json::json;

    fn plan(catalog: &Catalog<Value>, query: &str) -> OrderPlan<Value> {
        let request = WireDecoder::new(catalog).decode(
            RequestParams::from_query_string(query),
            Arc::new(|row: &Value| row.clone()),
        );
        compose_order(&request)
    }

    fn sorted_ids(plan: &OrderPlan<Value>, mut rows: Vec<Value>) -> Vec<i64> {
        rows.sort_by(|a, b| plan.compare(a, b));
        rows.iter().filter_map(|r| r["Id"].as_i64()).collect()
    }

    fn catalog() -> Catalog<Value> {
        Catalog::new(vec![
            ColumnDescriptor::new("id", "Id").orderable(),
            ColumnDescriptor::new("a", "A").orderable(),
            ColumnDescriptor::new("b", "B").orderable(),
            ColumnDescriptor::new("c", "C"),
        ])
        .unwrap()
    }

    #[test]
    fn test_type_order() {
        let ordered = [
            json!(null),
            json!(false),
            json!(true),
            json!(-1),
            json!(2.5),
            json!("a"),
            json!([1]),
            json!({"a": 1}),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(compare_values(&pair[0], &pair[1], false), Ordering::Less, "{:?}", pair);
        }
    }

    #[test]
    fn test_missing_cells_sort_with_nulls() {
        let catalog = catalog();
        let plan = plan(&catalog, "columns[0][data]=a&order[0][column]=0");

        let rows = vec![
            json!({"Id": 1, "A": 3}),
            json!({"Id": 2, "A": null}),
            json!({"Id": 3}),
            json!({"Id": 4, "A": false}),
        ];
        assert_eq!(sorted_ids(&plan, rows), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(compare_values(&json!(9), &json!(10), false), Ordering::Less);
        assert_eq!(compare_values(&json!(1.5), &json!(1), false), Ordering::Greater);
        assert_eq!(compare_values(&json!(u64::MAX), &json!(1), false), Ordering::Greater);
        assert_eq!(compare_values(&json!(-3), &json!(u64::MAX), false), Ordering::Less);
    }

    #[test]
    fn test_case_insensitive_strings() {
        assert_eq!(compare_values(&json!("b"), &json!("B"), false), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("B"), true), Ordering::Equal);
        assert_eq!(compare_values(&json!("apple"), &json!("Banana"), false), Ordering::Greater);
        assert_eq!(compare_values(&json!("apple"), &json!("Banana"), true), Ordering::Less);
    }

    #[test]
    fn test_two_key_ordering() {
        let catalog = catalog();
        let plan = plan(
            &catalog,
            "columns[0][data]=a&columns[1][data]=b\
             &order[0][column]=0&order[0][dir]=asc&order[1][column]=1&order[1][dir]=desc",
        );
        assert_eq!(plan.describe(), "A asc, B desc");

        let rows = vec![
            json!({"Id": 1, "A": 2, "B": "x"}),
            json!({"Id": 2, "A": 1, "B": "a"}),
            json!({"Id": 3, "A": 2, "B": "z"}),
            json!({"Id": 4, "A": 1, "B": "m"}),
        ];
        assert_eq!(sorted_ids(&plan, rows), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_slot_order_not_column_order() {
        let catalog = catalog();
        let plan = plan(
            &catalog,
            "columns[0][data]=a&columns[1][data]=b&order[0][column]=1&order[1][column]=0",
        );
        assert_eq!(plan.describe(), "B asc, A asc");
    }

    #[test]
    fn test_non_orderable_columns_ignored() {
        let catalog = catalog();
        let plan = plan(&catalog, "columns[0][data]=c&order[0][column]=0");
        assert!(plan.is_empty());
    }

    #[test]
    fn test_empty_plan_keeps_source_order() {
        let catalog = catalog();
        let plan = plan(&catalog, "columns[0][data]=a&order[0][column]=7");
        let rows = vec![json!({"Id": 3, "A": 1}), json!({"Id": 1, "A": 0}), json!({"Id": 2, "A": 5})];
        assert_eq!(sorted_ids(&plan, rows), vec![3, 1, 2]);
    }

    #[test]
    fn test_case_insensitive_ordering_from_catalog() {
        let catalog = Catalog::new(vec![
            ColumnDescriptor::<Value>::new("name", "Name").orderable().order_case_insensitive(),
        ])
        .unwrap();
        let plan = plan(&catalog, "columns[0][data]=name&order[0][column]=0");
        assert_eq!(plan.describe(), "lower(Name) asc");

        let rows = vec![
            json!({"Id": 1, "Name": "bob"}),
            json!({"Id": 2, "Name": "Carla"}),
            json!({"Id": 3, "Name": "anna"}),
            json!({"Id": 4, "Name": "Bob"}),
        ];
        assert_eq!(sorted_ids(&plan, rows), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_alternate_order_target() {
        let catalog = Catalog::new(vec![
            ColumnDescriptor::<Value>::new("name", "Name")
                .orderable()
                .order_by_property("Rank"),
        ])
        .unwrap();
        let plan = plan(&catalog, "columns[0][data]=name&order[0][column]=0&order[0][dir]=desc");

        let rows = vec![
            json!({"Id": 1, "Name": "a", "Rank": 2}),
            json!({"Id": 2, "Name": "b", "Rank": 9}),
            json!({"Id": 3, "Name": "c", "Rank": 5}),
        ];
        assert_eq!(sorted_ids(&plan, rows), vec![2, 3, 1]);
    }
}
