//! Queryable capability
//!
//! The data source is consumed only through this trait. Operations compose
//! lazily; work happens in `count` and `materialize`, which is also where a
//! source reports its own execution errors.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use super::order::{OrderKey, OrderPlan};
use super::predicate::RowPredicate;

/// Abstract, composable query over rows of type `E`.
pub trait Queryable<E>: Sized {
    /// Error raised while executing the query; passed through unchanged.
    type Error;

    /// Keep rows matching `predicate`.
    fn filter(self, predicate: RowPredicate<E>) -> Self;

    /// Order by `key`. With `then` set the key only breaks ties of the
    /// ordering so far; otherwise it replaces it.
    fn order_by(self, key: OrderKey<E>, then: bool) -> Self;

    /// Number of rows the query currently yields.
    fn count(&self) -> Result<u64, Self::Error>;

    fn skip(self, n: u64) -> Self;

    fn take(self, n: u64) -> Self;

    fn materialize(self) -> Result<Vec<E>, Self::Error>;

    /// Readable form of the composed query for diagnostics.
    fn describe(&self) -> String;
}

/// Lazy query over rows held in memory.
pub struct MemoryQueryable<E> {
    rows: Arc<[E]>,
    filters: Vec<RowPredicate<E>>,
    order: Vec<OrderKey<E>>,
    skip: u64,
    take: Option<u64>,
}

impl<E> MemoryQueryable<E> {
    pub fn new(rows: impl Into<Arc<[E]>>) -> Self {
        Self {
            rows: rows.into(),
            filters: Vec::new(),
            order: Vec::new(),
            skip: 0,
            take: None,
        }
    }

    pub fn rows(&self) -> &Arc<[E]> {
        &self.rows
    }

    /// Indices of the rows the query yields, in output order.
    fn evaluate(&self) -> Vec<usize> {
        let mut selected: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.filters.iter().all(|p| p.matches(&self.rows[i])))
            .collect();

        if !self.order.is_empty() {
            let plan = OrderPlan::new(self.order.clone());
            // stable: ties keep source order
            selected.sort_by(|&a, &b| plan.compare(&self.rows[a], &self.rows[b]));
        }

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let take = self
            .take
            .map_or(usize::MAX, |t| usize::try_from(t).unwrap_or(usize::MAX));

        selected.into_iter().skip(skip).take(take).collect()
    }
}

impl<E> Clone for MemoryQueryable<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            filters: self.filters.clone(),
            order: self.order.clone(),
            skip: self.skip,
            take: self.take,
        }
    }
}

impl<E> From<Vec<E>> for MemoryQueryable<E> {
    fn from(rows: Vec<E>) -> Self {
        Self::new(rows)
    }
}

impl<E: Clone> Queryable<E> for MemoryQueryable<E> {
    type Error = Infallible;

    fn filter(mut self, predicate: RowPredicate<E>) -> Self {
        self.filters.push(predicate);
        self
    }

    fn order_by(mut self, key: OrderKey<E>, then: bool) -> Self {
        if !then {
            self.order.clear();
        }
        self.order.push(key);
        self
    }

    fn count(&self) -> Result<u64, Self::Error> {
        Ok(self.evaluate().len() as u64)
    }

    fn skip(mut self, n: u64) -> Self {
        self.skip = self.skip.saturating_add(n);
        self.take = self.take.map(|t| t.saturating_sub(n));
        self
    }

    fn take(mut self, n: u64) -> Self {
        self.take = Some(self.take.map_or(n, |t| t.min(n)));
        self
    }

    fn materialize(self) -> Result<Vec<E>, Self::Error> {
        Ok(self
            .evaluate()
            .into_iter()
            .map(|i| self.rows[i].clone())
            .collect())
    }

    fn describe(&self) -> String {
        let mut parts = vec![format!("rows[{}]", self.rows.len())];
        for predicate in &self.filters {
            parts.push(format!("where {}", predicate.description()));
        }
        if !self.order.is_empty() {
            let keys: Vec<_> = self.order.iter().map(OrderKey::describe).collect();
            parts.push(format!("order by {}", keys.join(", ")));
        }
        if self.skip > 0 {
            parts.push(format!("skip {}", self.skip));
        }
        if let Some(take) = self.take {
            parts.push(format!("take {}", take));
        }
        parts.join(" | ")
    }
}

impl<E> fmt::Debug for MemoryQueryable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQueryable")
            .field("rows", &self.rows.len())
            .field("filters", &self.filters)
            .field("order", &self.order)
            .field("skip", &self.skip)
            .field("take", &self.take)
            .finish()
    }
}
