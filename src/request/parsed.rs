//! Parsed request model
//!
//! Request-scoped columns share the catalog column through an `Arc` and carry
//! their own copies of the flags, so narrowing one request never touches the
//! catalog or another request.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::params::RequestParams;
use crate::catalog::{CatalogColumn, ColumnDescriptor};

/// Maps a source row to the view row returned to the client.
pub type RowMapper<E, V> = Arc<dyn Fn(&E) -> V + Send + Sync>;

/// Sort direction of one ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case is descending; anything else is ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }
}

/// Requested ordering of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOrdering {
    /// Sort slot on the wire; lowest slot is the primary key
    pub index: usize,
    pub direction: SortDirection,
}

/// A catalog column attached to one request.
pub struct RequestColumn<E> {
    column: Arc<CatalogColumn<E>>,
    /// Numeric column index used on the wire
    pub index: usize,
    pub searchable: bool,
    pub orderable: bool,
    pub search_case_insensitive: bool,
    pub order_case_insensitive: bool,
    /// Effective regex flag for the column-scoped search value
    pub search_regex: bool,
    pub search_value: String,
    pub ordering: Option<ColumnOrdering>,
}

impl<E> RequestColumn<E> {
    /// Request copy of a catalog column with the catalog's flags.
    pub fn new(column: Arc<CatalogColumn<E>>, index: usize) -> Self {
        let descriptor = column.descriptor();
        Self {
            index,
            searchable: descriptor.searchable,
            orderable: descriptor.orderable,
            search_case_insensitive: descriptor.search_case_insensitive,
            order_case_insensitive: descriptor.order_case_insensitive,
            search_regex: false,
            search_value: String::new(),
            ordering: None,
            column,
        }
    }

    pub fn catalog_column(&self) -> &Arc<CatalogColumn<E>> {
        &self.column
    }

    pub fn descriptor(&self) -> &ColumnDescriptor<E> {
        self.column.descriptor()
    }

    pub fn public_name(&self) -> &str {
        self.column.public_name()
    }

    /// Whether the server opted this column into regex search.
    pub fn regex_allowed(&self) -> bool {
        self.column.descriptor().search_regex
    }

    pub fn value(&self, row: &E) -> Value {
        self.column.value(row)
    }
}

impl<E> Clone for RequestColumn<E> {
    fn clone(&self) -> Self {
        Self {
            column: Arc::clone(&self.column),
            index: self.index,
            searchable: self.searchable,
            orderable: self.orderable,
            search_case_insensitive: self.search_case_insensitive,
            order_case_insensitive: self.order_case_insensitive,
            search_regex: self.search_regex,
            search_value: self.search_value.clone(),
            ordering: self.ordering,
        }
    }
}

impl<E> fmt::Debug for RequestColumn<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestColumn")
            .field("public_name", &self.public_name())
            .field("index", &self.index)
            .field("searchable", &self.searchable)
            .field("orderable", &self.orderable)
            .field("search_case_insensitive", &self.search_case_insensitive)
            .field("order_case_insensitive", &self.order_case_insensitive)
            .field("search_regex", &self.search_regex)
            .field("search_value", &self.search_value)
            .field("ordering", &self.ordering)
            .finish()
    }
}

/// Client input the decoder ignored or narrowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeDiagnostics {
    /// Column identities with no catalog entry, or repeated
    pub dropped_columns: Vec<String>,
    /// Sort slots that resolved to no orderable column
    pub dropped_sorts: Vec<usize>,
    /// Columns whose regex request was downgraded to plain search
    pub regex_downgrades: Vec<String>,
}

impl DecodeDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.dropped_columns.is_empty()
            && self.dropped_sorts.is_empty()
            && self.regex_downgrades.is_empty()
    }
}

/// A decoded request, reconciled against the catalog.
pub struct ParsedRequest<E, V> {
    /// 1-based
    pub page_number: i64,
    /// `<= 0` disables pagination
    pub page_size: i64,
    pub draw: i64,
    pub global_search: String,
    /// Client asked for regex global search
    pub global_regex: bool,
    /// Matched columns, ascending by wire index
    pub columns: Vec<RequestColumn<E>>,
    /// Original parameters, for diagnostics
    pub params: RequestParams,
    pub diagnostics: DecodeDiagnostics,
    mapping: RowMapper<E, V>,
}

impl<E, V> ParsedRequest<E, V> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        page_number: i64,
        page_size: i64,
        draw: i64,
        global_search: String,
        global_regex: bool,
        columns: Vec<RequestColumn<E>>,
        params: RequestParams,
        diagnostics: DecodeDiagnostics,
        mapping: RowMapper<E, V>,
    ) -> Self {
        Self {
            page_number,
            page_size,
            draw,
            global_search,
            global_regex,
            columns,
            params,
            diagnostics,
            mapping,
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.page_size > 0
    }

    /// Rows to skip before the requested page.
    pub fn offset(&self) -> u64 {
        if self.is_paginated() {
            (self.page_number.saturating_sub(1).max(0))
                .saturating_mul(self.page_size)
                .unsigned_abs()
        } else {
            0
        }
    }

    pub fn column(&self, public_name: &str) -> Option<&RequestColumn<E>> {
        self.columns.iter().find(|c| c.public_name() == public_name)
    }

    pub fn column_mut(&mut self, public_name: &str) -> Option<&mut RequestColumn<E>> {
        self.columns.iter_mut().find(|c| c.public_name() == public_name)
    }

    pub fn mapping(&self) -> &RowMapper<E, V> {
        &self.mapping
    }

    pub fn map_row(&self, row: &E) -> V {
        (self.mapping)(row)
    }
}

impl<E, V> fmt::Debug for ParsedRequest<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedRequest")
            .field("page_number", &self.page_number)
            .field("page_size", &self.page_size)
            .field("draw", &self.draw)
            .field("global_search", &self.global_search)
            .field("global_regex", &self.global_regex)
            .field("columns", &self.columns)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
