//! Query planner (verb module)
//!
//! Transforms a Criteria (plus one of its aggregations) into a logical plan.

mod aggregate;
mod error;
mod filter;
mod joins;
mod search;

pub use aggregate::{group_alias, plan_aggregation, plan_aggregations, VALUE_ALIAS};
pub use error::PlanError;
pub use search::{plan_read, plan_search, plan_total, ID_ALIAS, TOTAL_ALIAS};
