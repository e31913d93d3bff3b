//! Predicate composer
//!
//! Builds the single row predicate for a request:
//!
//! ```text
//! (global_1 OR global_2 OR ...) AND (column_1 AND column_2 AND ...)
//! ```
//!
//! Either half may be absent, which reads as `true`. Each per-column test is
//! resolved through the column's override chain and falls back to the default
//! substring/regex test.

use std::fmt;
use std::sync::Arc;

use regex::RegexBuilder;

use crate::catalog::{cell_text, SearchPredicate, SearchScope};
use crate::observability::{log_event_with_fields, Event};
use crate::request::{ParsedRequest, RequestColumn};

/// Upper bound on compiled regex size for client-supplied patterns.
const REGEX_SIZE_LIMIT: usize = 1 << 20;

type RowTest<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A boolean test over one row plus a readable description of it.
pub struct RowPredicate<E> {
    test: RowTest<E>,
    description: String,
}

impl<E: 'static> RowPredicate<E> {
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
            description: description.into(),
        }
    }

    /// Matches nothing.
    pub fn never(description: impl Into<String>) -> Self {
        Self::new(description, |_: &E| false)
    }

    pub fn and(self, other: RowPredicate<E>) -> Self {
        let description = format!("({}) AND ({})", self.description, other.description);
        let (left, right) = (self.test, other.test);
        Self::new(description, move |row: &E| left(row) && right(row))
    }

    /// OR over all parts; `None` when there are none.
    pub fn any(parts: Vec<RowPredicate<E>>) -> Option<Self> {
        Self::combine(parts, " OR ", |tests, row| tests.iter().any(|t| t(row)))
    }

    /// AND over all parts; `None` when there are none.
    pub fn all(parts: Vec<RowPredicate<E>>) -> Option<Self> {
        Self::combine(parts, " AND ", |tests, row| tests.iter().all(|t| t(row)))
    }

    fn combine(
        parts: Vec<RowPredicate<E>>,
        joiner: &str,
        fold: fn(&[RowTest<E>], &E) -> bool,
    ) -> Option<Self> {
        match parts.len() {
            0 => None,
            1 => parts.into_iter().next(),
            _ => {
                let description = parts
                    .iter()
                    .map(|p| p.description.as_str())
                    .collect::<Vec<_>>()
                    .join(joiner);
                let tests: Vec<RowTest<E>> = parts.into_iter().map(|p| p.test).collect();
                Some(Self::new(description, move |row: &E| fold(&tests, row)))
            }
        }
    }
}

impl<E> RowPredicate<E> {
    pub fn matches(&self, row: &E) -> bool {
        (self.test)(row)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<E> Clone for RowPredicate<E> {
    fn clone(&self) -> Self {
        Self {
            test: Arc::clone(&self.test),
            description: self.description.clone(),
        }
    }
}

impl<E> fmt::Debug for RowPredicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RowPredicate").field(&self.description).finish()
    }
}

/// Compose the filter for `request`. `None` means every row survives.
pub fn compose_predicate<E: 'static, V>(request: &ParsedRequest<E, V>) -> Option<RowPredicate<E>> {
    let global = compose_global(request);
    let column = compose_column(request);

    match (global, column) {
        (Some(global), Some(column)) => Some(global.and(column)),
        (global, column) => global.or(column),
    }
}

fn compose_global<E: 'static, V>(request: &ParsedRequest<E, V>) -> Option<RowPredicate<E>> {
    let text = request.global_search.as_str();
    if text.is_empty() {
        return None;
    }

    let tests = request
        .columns
        .iter()
        .filter(|c| c.searchable)
        .map(|column| {
            let regex = request.global_regex && column.regex_allowed();
            column_test(column, SearchScope::Global, text, regex)
        })
        .collect();

    RowPredicate::any(tests)
}

fn compose_column<E: 'static, V>(request: &ParsedRequest<E, V>) -> Option<RowPredicate<E>> {
    let tests = request
        .columns
        .iter()
        .filter(|c| c.searchable && !c.search_value.is_empty())
        .map(|column| {
            column_test(column, SearchScope::Column, &column.search_value, column.search_regex)
        })
        .collect();

    RowPredicate::all(tests)
}

fn column_test<E: 'static>(
    column: &RequestColumn<E>,
    scope: SearchScope,
    text: &str,
    regex: bool,
) -> RowPredicate<E> {
    match column.descriptor().overrides.resolve(scope, text) {
        Some(predicate) => override_test(column, scope, text, predicate),
        None => default_test(column, text, regex, column.search_case_insensitive),
    }
}

fn override_test<E: 'static>(
    column: &RequestColumn<E>,
    scope: SearchScope,
    text: &str,
    predicate: SearchPredicate<E>,
) -> RowPredicate<E> {
    let description = format!("{}[{} override] {:?}", column.public_name(), scope.as_str(), text);
    let text = text.to_string();
    RowPredicate::new(description, move |row: &E| predicate(row, &text))
}

/// Substring containment, or a regex match when `regex` is set. Cells
/// without text (`null`) never match.
fn default_test<E: 'static>(
    column: &RequestColumn<E>,
    text: &str,
    regex: bool,
    case_insensitive: bool,
) -> RowPredicate<E> {
    let name = column.public_name().to_string();
    let accessor = Arc::clone(column.catalog_column().accessor());

    if regex {
        let compiled = RegexBuilder::new(text)
            .case_insensitive(case_insensitive)
            .size_limit(REGEX_SIZE_LIMIT)
            .build();

        return match compiled {
            Ok(pattern) => {
                let description = format!("{} =~ /{}/", name, text);
                RowPredicate::new(description, move |row: &E| {
                    cell_text(&accessor(row)).is_some_and(|cell| pattern.is_match(&cell))
                })
            }
            Err(err) => {
                let reason = err.to_string();
                log_event_with_fields(
                    Event::InvalidSearchPattern,
                    &[("column", name.as_str()), ("reason", reason.as_str())],
                );
                RowPredicate::never(format!("{} =~ <invalid pattern>", name))
            }
        };
    }

    if case_insensitive {
        let needle = text.to_lowercase();
        let description = format!("lower({}) contains {:?}", name, needle);
        RowPredicate::new(description, move |row: &E| {
            cell_text(&accessor(row)).is_some_and(|cell| cell.to_lowercase().contains(&needle))
        })
    } else {
        let needle = text.to_string();
        let description = format!("{} contains {:?}", name, needle);
        RowPredicate::new(description, move |row: &E| {
            cell_text(&accessor(row)).is_some_and(|cell| cell.contains(&needle))
        })
    }
}
