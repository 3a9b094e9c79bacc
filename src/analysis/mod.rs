//! Filtering of a `TransactionTable` into a `View`, and the grouped and scalar statistics that
//! are computed from a view.
//!
//! Nothing here mutates the table. Every aggregation is a fresh single pass over the view, so
//! callers recompute whenever the filters change.

mod aggregate;
mod filter;
mod summary;

pub use aggregate::{group_by, Point, Series};
pub use filter::{filter, DateRange, FilterSpec, ProductFilter, SortColumn, View};
pub use summary::{Headline, Summary};
