//! Query request types (noun module)
//!
//! A `Criteria` is what application code hands to a repository: filters,
//! aggregations, sorting and paging, expressed over field paths.

mod aggregation;
mod context;
mod criteria;
mod filter;

pub use aggregation::{Aggregation, FieldAggregation, StatsAggregation};
pub use context::{Context, DEFAULT_LANGUAGE_UUID};
pub use criteria::{Criteria, FieldSorting, SortDirection};
pub use filter::{Filter, MultiOperator, RangeParameters};
