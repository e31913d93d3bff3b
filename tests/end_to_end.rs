//! End-to-end table behaviour
//!
//! Raw query string in, wire response out, over in-memory rows:
//! - draw counter echo
//! - single filtered count for both totals
//! - global search OR over searchable columns only
//! - column search AND
//! - multi-key ordering
//! - case-insensitive search
//! - robustness against bad client input

use std::sync::Arc;

use datatables::catalog::{Catalog, ColumnDescriptor, SearchPredicate};
use datatables::observability::DiagnosticHook;
use datatables::query::MemoryQueryable;
use datatables::{DataTable, TableConfig};
use serde::Serialize;
use serde_json::{json, Value};

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone)]
struct Person {
    id: u32,
    name: String,
    city: String,
    age: u32,
}

datatables::impl_entity!(Person {
    "Id" => id,
    "Name" => name,
    "City" => city,
    "Age" => age,
});

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PersonView {
    id: u32,
    name: String,
    city: String,
}

fn view(p: &Person) -> PersonView {
    PersonView {
        id: p.id,
        name: p.name.clone(),
        city: p.city.clone(),
    }
}

fn person(id: u32, name: &str, city: &str, age: u32) -> Person {
    Person {
        id,
        name: name.to_string(),
        city: city.to_string(),
        age,
    }
}

fn people() -> MemoryQueryable<Person> {
    MemoryQueryable::from(vec![
        person(1, "Smith", "Graz", 40),
        person(2, "smith", "Linz", 25),
        person(3, "Jones", "Graz", 25),
        person(4, "Brown", "Wels", 40),
        person(5, "Adams", "Linz", 33),
    ])
}

fn catalog(city_searchable: bool) -> Catalog<Person> {
    let city = ColumnDescriptor::new("city", "City").orderable();
    let city = if city_searchable { city.searchable() } else { city };

    Catalog::new(vec![
        ColumnDescriptor::new("id", "Id").sortable_searchable(),
        ColumnDescriptor::new("name", "Name")
            .sortable_searchable()
            .search_case_sensitive(),
        city,
        ColumnDescriptor::new("age", "Age").orderable(),
    ])
    .unwrap()
}

fn table() -> DataTable<Person, PersonView> {
    DataTable::new(catalog(true), view, TableConfig::default())
}

const COLUMNS: &str = "columns[0][data]=id&columns[1][data]=name&columns[2][data]=city&columns[3][data]=age";

fn ids(response: &Value) -> Vec<i64> {
    response["data"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default()
}

fn render(table: &DataTable<Person, PersonView>, query: &str) -> Value {
    table
        .render_response(query, people())
        .unwrap()
        .to_value()
        .unwrap()
}

// =============================================================================
// Reference scenario
// =============================================================================

#[test]
fn test_reference_scenario() {
    let catalog = Catalog::new(vec![
        ColumnDescriptor::<Value>::new("id", "Id").sortable_searchable(),
        ColumnDescriptor::<Value>::new("name", "Name").sortable_searchable(),
    ])
    .unwrap();
    let table = DataTable::new(catalog, |row: &Value| row.clone(), TableConfig::default());
    let rows = MemoryQueryable::from(vec![
        json!({"Id": 1, "Name": "Anna"}),
        json!({"Id": 2, "Name": "Bob"}),
        json!({"Id": 3, "Name": "Annika"}),
    ]);

    let response = table
        .render_response(
            "start=0&length=2&search[value]=ann&columns[0][data]=id&columns[0][searchable]=true\
             &columns[1][data]=name&columns[1][searchable]=true",
            rows,
        )
        .unwrap()
        .to_value()
        .unwrap();

    assert_eq!(response["recordsFiltered"], 2);
    assert_eq!(response["recordsTotal"], 2);
    assert_eq!(
        response["data"],
        json!([{"id": 1, "name": "Anna"}, {"id": 3, "name": "Annika"}])
    );
}

// =============================================================================
// Protocol bookkeeping
// =============================================================================

#[test]
fn test_draw_echoed() {
    let response = render(&table(), &format!("draw=7&{}", COLUMNS));
    assert_eq!(response["draw"], 7);

    let response = render(&table(), &format!("draw=oops&{}", COLUMNS));
    assert_eq!(response["draw"], 0);
}

#[test]
fn test_records_total_equals_filtered_count() {
    let response = render(&table(), &format!("{}&length=1&search[value]=Graz", COLUMNS));

    assert_eq!(response["recordsFiltered"], 2);
    assert_eq!(response["recordsTotal"], response["recordsFiltered"]);
    assert_eq!(ids(&response).len(), 1);
}

#[test]
fn test_records_total_unfiltered_when_configured() {
    let config = TableConfig {
        count_unfiltered_total: true,
        ..Default::default()
    };
    let table = DataTable::new(catalog(true), view, config);
    let response = render(&table, &format!("{}&search[value]=Graz", COLUMNS));

    assert_eq!(response["recordsTotal"], 5);
    assert_eq!(response["recordsFiltered"], 2);
}

#[test]
fn test_fields_relabeled_at_serialization() {
    let table = table();
    let page = table
        .render_results(format!("{}&length=1", COLUMNS).as_str(), people())
        .unwrap();
    assert_eq!(page.items[0].name, "Smith");

    let response = render(&table, &format!("{}&length=1", COLUMNS));
    assert_eq!(response["data"], json!([{"id": 1, "name": "Smith", "city": "Graz"}]));
}

// =============================================================================
// Searching
// =============================================================================

#[test]
fn test_searchable_flag_controls_global_search() {
    let query = format!("{}&search[value]=Linz", COLUMNS);

    let with_city = DataTable::new(catalog(true), view, TableConfig::default());
    let without_city = DataTable::new(catalog(false), view, TableConfig::default());

    assert_eq!(ids(&render(&with_city, &query)), vec![2, 5]);
    assert!(ids(&render(&without_city, &query)).is_empty());
}

#[test]
fn test_column_search_is_conjunctive() {
    let query = format!(
        "{}&columns[1][search][value]=Smith&columns[2][search][value]=Linz",
        COLUMNS
    );
    // row 1 matches the name only, row 2 matches the city only (name is "smith")
    assert!(ids(&render(&table(), &query)).is_empty());

    let query = format!(
        "{}&columns[1][search][value]=Jones&columns[2][search][value]=Graz",
        COLUMNS
    );
    assert_eq!(ids(&render(&table(), &query)), vec![3]);
}

#[test]
fn test_case_insensitive_search() {
    let sensitive = table();
    let query = format!("{}&columns[1][search][value]=smith", COLUMNS);
    assert_eq!(ids(&render(&sensitive, &query)), vec![2]);

    let insensitive = DataTable::new(
        Catalog::new(vec![
            ColumnDescriptor::new("id", "Id").orderable(),
            ColumnDescriptor::new("name", "Name").searchable(),
        ])
        .unwrap(),
        view,
        TableConfig::default(),
    );
    let query = "columns[0][data]=id&columns[1][data]=name&columns[1][search][value]=smith";
    assert_eq!(ids(&render(&insensitive, query)), vec![1, 2]);

    let query = "columns[0][data]=id&columns[1][data]=name&columns[1][search][value]=SMITH";
    assert_eq!(ids(&render(&insensitive, query)), vec![1, 2]);
}

#[test]
fn test_client_requested_case_insensitivity() {
    let query = format!("{}&columns[1][search][value]=smith&columns[1][cisearch]=true", COLUMNS);
    assert_eq!(ids(&render(&table(), &query)), vec![1, 2]);
}

#[test]
fn test_search_override_on_computed_value() {
    let catalog = Catalog::new(vec![
        ColumnDescriptor::new("id", "Id").orderable(),
        ColumnDescriptor::new("age", "Age")
            .searchable()
            .search_provider(|text| {
                let (low, high) = text.split_once('-')?;
                let (low, high): (u32, u32) = (low.parse().ok()?, high.parse().ok()?);
                Some(Arc::new(move |p: &Person, _: &str| (low..=high).contains(&p.age))
                    as SearchPredicate<Person>)
            }),
    ])
    .unwrap();
    let table = DataTable::new(catalog, view, TableConfig::default());

    let response = render(
        &table,
        "columns[0][data]=id&columns[1][data]=age&columns[1][search][value]=30-45",
    );
    assert_eq!(ids(&response), vec![1, 4, 5]);
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_two_key_ordering_matches_manual_sort() {
    let query = format!(
        "{}&order[0][column]=3&order[0][dir]=asc&order[1][column]=1&order[1][dir]=desc",
        COLUMNS
    );
    let response = render(&table(), &query);

    let mut expected = vec![
        person(1, "Smith", "Graz", 40),
        person(2, "smith", "Linz", 25),
        person(3, "Jones", "Graz", 25),
        person(4, "Brown", "Wels", 40),
        person(5, "Adams", "Linz", 33),
    ];
    expected.sort_by(|a, b| a.age.cmp(&b.age).then_with(|| b.name.cmp(&a.name)));
    let expected: Vec<i64> = expected.iter().map(|p| i64::from(p.id)).collect();

    assert_eq!(ids(&response), expected);
    assert_eq!(expected, vec![2, 3, 5, 1, 4]);
}

#[test]
fn test_bad_sort_index_keeps_order() {
    let plain = render(&table(), COLUMNS);
    let bad = render(&table(), &format!("{}&order[0][column]=42&order[0][dir]=desc", COLUMNS));
    let garbage = render(&table(), &format!("{}&order[0][column]=abc", COLUMNS));

    assert_eq!(ids(&plain), vec![1, 2, 3, 4, 5]);
    assert_eq!(ids(&bad), ids(&plain));
    assert_eq!(ids(&garbage), ids(&plain));
}

#[test]
fn test_unorderable_column_sort_ignored() {
    let table = DataTable::new(catalog(true), view, TableConfig::default());
    let query = "columns[0][data]=id&columns[0][orderable]=false&order[0][column]=0&order[0][dir]=desc";
    assert_eq!(ids(&render(&table, query)), vec![1, 2, 3, 4, 5]);
}

// =============================================================================
// Paging
// =============================================================================

#[test]
fn test_paging_through_ordered_rows() {
    let query = format!("{}&order[0][column]=0&order[0][dir]=desc&length=2", COLUMNS);

    let first = render(&table(), &format!("{}&start=0", query));
    let second = render(&table(), &format!("{}&start=2", query));
    let third = render(&table(), &format!("{}&start=4", query));

    assert_eq!(ids(&first), vec![5, 4]);
    assert_eq!(ids(&second), vec![3, 2]);
    assert_eq!(ids(&third), vec![1]);
}

#[test]
fn test_paging_disabled() {
    let table = table();
    let page = table
        .render_results(format!("{}&start=3&length=-1", COLUMNS).as_str(), people())
        .unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.pages_count, 1);
}

// =============================================================================
// Robustness
// =============================================================================

#[test]
fn test_unknown_columns_dropped() {
    let response = render(
        &table(),
        "columns[0][data]=password&columns[0][search][value]=x&columns[1][data]=id",
    );
    assert_eq!(ids(&response).len(), 5);
}

#[test]
fn test_start_beyond_integer_range_yields_empty_page() {
    let response = render(
        &table(),
        &format!("draw=2&{}&start=9223372036854775807&length=1", COLUMNS),
    );

    assert_eq!(response["draw"], 2);
    assert_eq!(response["recordsFiltered"], 5);
    assert_eq!(response["data"], json!([]));
}

#[test]
fn test_garbage_query_falls_back_to_defaults() {
    let table = table();
    let page = table
        .render_results("start=x&length=y&draw=z&search[regex]=maybe&%%%", people())
        .unwrap();
    assert_eq!(page.page_number, 1);
    assert_eq!(page.page_size, 15);
    assert_eq!(page.items.len(), 5);
}

#[test]
fn test_concurrent_requests_share_table() {
    let table = Arc::new(table());
    let handles: Vec<_> = (0..8i64)
        .map(|i| {
            let table = Arc::clone(&table);
            std::thread::spawn(move || {
                let query = format!(
                    "draw={}&columns[0][data]=id&columns[0][searchable]={}&search[value]=3",
                    i,
                    i % 2 == 0
                );
                let response = table.render_response(query.as_str(), people()).unwrap();
                (i, response.draw, response.records_filtered)
            })
        })
        .collect();

    for handle in handles {
        let (i, draw, filtered) = handle.join().unwrap();
        assert_eq!(draw, i);
        assert_eq!(filtered, if i % 2 == 0 { 1 } else { 5 });
    }
    assert!(table.catalog().get("id").unwrap().descriptor().searchable);
}

#[test]
fn test_log_hook_never_blocks_or_fails() {
    let table = table().with_log_hook(DiagnosticHook::new(|_| panic!("hook failure")));
    let response = render(&table, &format!("draw=3&{}", COLUMNS));
    assert_eq!(response["draw"], 3);
}
