//! Logical plan types (noun module)
//!
//! Represents a relational algebra tree that the emitter turns into SQL.

mod expr;
mod node;

pub use expr::{AggregateExpr, AggregateFunction, BinaryOperator, Column, Expr, Literal};
pub use node::{
    Aggregate, Filter, Join, Limit, Params, PlanNode, Project, ProjectExpr, QueryPlan,
    Scan, Sort, SortDirection, SortKey,
};
