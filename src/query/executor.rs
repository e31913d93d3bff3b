//! Query executor
//!
//! Applies the composed predicate and ordering to a [`Queryable`], counts the
//! filtered set, cuts the requested page and maps each row.
//!
//! Errors from the source are returned exactly as the source produced them.

use super::order::compose_order;
use super::paged::PagedList;
use super::predicate::compose_predicate;
use super::queryable::Queryable;
use crate::observability::{log_event_with_fields, DiagnosticHook, Event};
use crate::request::ParsedRequest;

/// Knobs for one execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionOptions<'a> {
    /// Count the source once more before filtering
    pub count_unfiltered_total: bool,
    /// Receives the request dump and query description before execution
    pub log_hook: Option<&'a DiagnosticHook>,
}

/// Execute `request` against `source`.
pub fn execute<E, V, Q>(
    request: &ParsedRequest<E, V>,
    source: Q,
    options: ExecutionOptions<'_>,
) -> Result<PagedList<V>, Q::Error>
where
    E: 'static,
    Q: Queryable<E>,
{
    let unfiltered = if options.count_unfiltered_total {
        Some(source.count()?)
    } else {
        None
    };

    let mut query = source;
    if let Some(predicate) = compose_predicate(request) {
        query = query.filter(predicate);
    }
    for (i, key) in compose_order(request).into_keys().into_iter().enumerate() {
        query = query.order_by(key, i > 0);
    }

    let offset = request.offset();
    if let Some(hook) = options.log_hook {
        let mut description = query.describe();
        if request.is_paginated() {
            description.push_str(&format!(" | skip {} | take {}", offset, request.page_size));
        }
        hook.emit(format!("{}\n\n{}", request.params, description));
    }

    let total = query.count()?;

    let page = if request.is_paginated() {
        query.skip(offset).take(request.page_size.unsigned_abs())
    } else {
        query
    };

    let items: Vec<V> = page
        .materialize()?
        .iter()
        .map(|row| request.map_row(row))
        .collect();

    let total_text = total.to_string();
    let rows_text = items.len().to_string();
    log_event_with_fields(
        Event::QueryExecuted,
        &[("filtered", total_text.as_str()), ("rows", rows_text.as_str())],
    );

    let paged = PagedList::new(items, total, request.page_number, request.page_size);
    Ok(match unfiltered {
        Some(count) => paged.with_unfiltered_count(count),
        None => paged,
    })
}
