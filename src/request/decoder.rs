//! Wire decoder
//!
//! Turns the flat parameter bag into a [`ParsedRequest`]. Client input is
//! untrusted and decoding never fails:
//!
//! - unparsable numbers fall back to their defaults
//! - columns the catalog does not expose are dropped
//! - sort slots that point at no orderable request column are dropped
//! - client flags can narrow catalog capabilities, never widen them
//!   (case-insensitivity is the one relaxation a client may request)

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::params::RequestParams;
use super::parsed::{
    ColumnOrdering, DecodeDiagnostics, ParsedRequest, RequestColumn, RowMapper, SortDirection,
};
use crate::catalog::Catalog;
use crate::observability::{log_event_with_fields, Event};

/// Page size used when the request carries no usable `length`.
pub const DEFAULT_PAGE_SIZE: i64 = 15;

/// Decodes requests against one catalog.
pub struct WireDecoder<'a, E> {
    catalog: &'a Catalog<E>,
    default_page_size: i64,
}

impl<'a, E> WireDecoder<'a, E> {
    pub fn new(catalog: &'a Catalog<E>) -> Self {
        Self {
            catalog,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_default_page_size(mut self, page_size: i64) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Decode `params` into a parsed request carrying `mapping`.
    pub fn decode<V>(&self, params: RequestParams, mapping: RowMapper<E, V>) -> ParsedRequest<E, V> {
        let start = parse_int(params.get("start")).unwrap_or(0).max(0);
        let page_size = parse_int(params.get("length")).unwrap_or(self.default_page_size);
        let draw = parse_int(params.get("draw")).unwrap_or(0);

        let page_number = if page_size > 0 {
            (start / page_size).saturating_add(1)
        } else {
            1
        };

        let global_search = params.get("search[value]").unwrap_or_default().to_string();
        let global_regex = parse_bool(params.get("search[regex]")).unwrap_or(false);

        let mut diagnostics = DecodeDiagnostics::default();
        let mut columns = self.decode_columns(&params, &mut diagnostics);

        if global_regex && !global_search.is_empty() {
            for column in columns.iter().filter(|c| c.searchable && !c.regex_allowed()) {
                if !diagnostics.regex_downgrades.iter().any(|n| n == column.public_name()) {
                    diagnostics.regex_downgrades.push(column.public_name().to_string());
                    log_event_with_fields(
                        Event::RegexDowngraded,
                        &[("column", column.public_name()), ("scope", "global")],
                    );
                }
            }
        }

        decode_orderings(&params, &mut columns, &mut diagnostics);

        let draw_text = draw.to_string();
        let column_count = columns.len().to_string();
        log_event_with_fields(
            Event::RequestDecoded,
            &[("columns", column_count.as_str()), ("draw", draw_text.as_str())],
        );

        ParsedRequest::new(
            page_number,
            page_size,
            draw,
            global_search,
            global_regex,
            columns,
            params,
            diagnostics,
            mapping,
        )
    }

    fn decode_columns(
        &self,
        params: &RequestParams,
        diagnostics: &mut DecodeDiagnostics,
    ) -> Vec<RequestColumn<E>> {
        let indices: BTreeSet<usize> = params
            .keys()
            .filter_map(|key| split_indexed(key, "columns"))
            .filter(|(_, rest)| *rest == "[data]" || *rest == "[name]")
            .map(|(index, _)| index)
            .collect();

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(indices.len());

        for index in indices {
            let field = |name: &str| params.get(&format!("columns[{}]{}", index, name));

            let identity = [field("[data]"), field("[name]")]
                .into_iter()
                .flatten()
                .find(|value| !value.is_empty())
                .unwrap_or_default();

            let catalog_column = match self.catalog.get(identity) {
                Some(column) if seen.insert(identity.to_string()) => column,
                _ => {
                    diagnostics.dropped_columns.push(identity.to_string());
                    let index_text = index.to_string();
                    log_event_with_fields(
                        Event::ColumnDropped,
                        &[("column", identity), ("index", index_text.as_str())],
                    );
                    continue;
                }
            };

            let mut column = RequestColumn::new(catalog_column.clone(), index);

            if parse_bool(field("[searchable]")) == Some(false) {
                column.searchable = false;
            }
            if parse_bool(field("[orderable]")) == Some(false) {
                column.orderable = false;
            }
            if parse_bool(field("[cisearch]")) == Some(true) {
                column.search_case_insensitive = true;
            }
            if parse_bool(field("[ciorder]")) == Some(true) {
                column.order_case_insensitive = true;
            }

            column.search_value = field("[search][value]").unwrap_or_default().to_string();

            let regex_requested = parse_bool(field("[search][regex]")).unwrap_or(false);
            column.search_regex = regex_requested && column.regex_allowed();
            if regex_requested && !column.regex_allowed() && !column.search_value.is_empty() {
                diagnostics.regex_downgrades.push(identity.to_string());
                log_event_with_fields(
                    Event::RegexDowngraded,
                    &[("column", identity), ("scope", "column")],
                );
            }

            columns.push(column);
        }

        columns
    }
}

fn decode_orderings<E>(
    params: &RequestParams,
    columns: &mut [RequestColumn<E>],
    diagnostics: &mut DecodeDiagnostics,
) {
    let slots: BTreeMap<usize, &str> = params
        .iter()
        .filter_map(|(key, value)| {
            let (slot, rest) = split_indexed(key, "order")?;
            (rest == "[column]").then_some((slot, value))
        })
        .fold(BTreeMap::new(), |mut slots, (slot, value)| {
            slots.entry(slot).or_insert(value);
            slots
        });

    for (slot, target) in slots {
        let direction = params
            .get(&format!("order[{}][dir]", slot))
            .map(SortDirection::parse)
            .unwrap_or_default();

        let resolved = target
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| columns.iter_mut().find(|c| c.index == index))
            .filter(|c| c.orderable && c.ordering.is_none());

        match resolved {
            Some(column) => {
                column.ordering = Some(ColumnOrdering {
                    index: slot,
                    direction,
                });
            }
            None => {
                diagnostics.dropped_sorts.push(slot);
                let slot_text = slot.to_string();
                log_event_with_fields(
                    Event::SortDropped,
                    &[("slot", slot_text.as_str()), ("target", target)],
                );
            }
        }
    }
}

/// `columns[12][search][value]` with prefix `columns` -> `(12, "[search][value]")`
fn split_indexed<'k>(key: &'k str, prefix: &str) -> Option<(usize, &'k str)> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('[')?;
    let close = rest.find(']')?;
    let digits = &rest[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse().ok()?;
    Some((index, &rest[close + 1..]))
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

fn parse_bool(raw: Option<&str>) -> Option<bool> {
    let raw = raw?.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
