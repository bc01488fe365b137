//! Planner errors

use thiserror::Error;

use crate::resolver::ResolveError;

#[derive(Debug, Error)]
pub enum PlanError {
    /// A stats aggregation with every statistic switched off
    #[error("StatsAggregation configured without fetch: '{name}'")]
    StatsWithoutFetch { name: String },
    /// avg/sum over a field that holds no numbers
    #[error("Aggregation '{name}' needs a numeric field, but '{field}' is of type {data_type}")]
    NonNumericField {
        name: String,
        field: String,
        data_type: String,
    },
    #[error("Aggregation name '{0}' is used more than once")]
    DuplicateAggregation(String),
    /// Sorting over a to-many path would multiply result rows
    #[error("Cannot sort by '{0}': the path crosses a to-many association")]
    ToManySorting(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
