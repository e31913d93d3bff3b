//! # Query composition and execution
//!
//! Parsed request → one [`RowPredicate`] + one [`OrderPlan`] → applied to a
//! [`Queryable`] → [`PagedList`].
//!
//! One count and one page query per request; everything else is delegated
//! to the queryable's own execution.

mod executor;
mod order;
mod paged;
mod predicate;
mod queryable;

pub use executor::{execute, ExecutionOptions};
pub use order::{compare_values, compose_order, OrderKey, OrderPlan};
pub use paged::{pages_count, PagedList};
pub use predicate::{compose_predicate, RowPredicate};
pub use queryable::{MemoryQueryable, Queryable};
