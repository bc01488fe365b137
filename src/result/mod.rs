//! Result types (noun module)
//!
//! Typed shapes for aggregation rows, search hits and hydrated records.

mod aggregation;
mod group_key;
mod record;
mod search;

pub use aggregation::{
    AggregationResult, AggregationRows, AggregatorResult, AvgResult, CardinalityResult,
    CountResult, MaxResult, MinResult, ResultRow, StatsResult, SumResult, ValueCountItem,
    ValueCountResult,
};
pub use group_key::GroupKey;
pub use record::{Hydrate, HydrateError, Record};
pub use search::IdSearchResult;
