//! One page of mapped rows plus the counts describing it

use serde::Serialize;

/// Page count for `total` rows: `ceil(total / page_size)` when paginated,
/// otherwise 1.
pub fn pages_count(total: u64, page_size: i64) -> u64 {
    if page_size > 0 {
        total.div_ceil(page_size.unsigned_abs())
    } else {
        1
    }
}

/// A page of results. Counts describe the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<V> {
    pub items: Vec<V>,
    /// Rows matching the filter, before paging
    pub total_count: u64,
    pub page_number: i64,
    pub page_size: i64,
    pub pages_count: u64,
    /// Rows in the source before filtering, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfiltered_count: Option<u64>,
}

impl<V> PagedList<V> {
    pub fn new(items: Vec<V>, total_count: u64, page_number: i64, page_size: i64) -> Self {
        Self {
            items,
            total_count,
            page_number,
            page_size,
            pages_count: pages_count(total_count, page_size),
            unfiltered_count: None,
        }
    }

    pub fn with_unfiltered_count(mut self, count: u64) -> Self {
        self.unfiltered_count = Some(count);
        self
    }

    pub fn is_paginated(&self) -> bool {
        self.page_size > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.is_paginated() && (self.page_number.max(0) as u64) < self.pages_count
    }

    pub fn has_previous_page(&self) -> bool {
        self.is_paginated() && self.page_number > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
