//! shopdal - Criteria aggregation and search over an entity schema
//!
//! This library provides:
//! - Entity definitions parsed from YAML
//! - Criteria with filters, sortings and aggregations over field paths
//! - Field path resolution across associations and translations
//! - Logical plan generation
//! - SQL emission and execution (SQLite)
//! - Typed aggregation results, id searches and record hydration
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `definition/` - entities, fields, associations (Schema, EntityDefinition)
//! - `criteria/` - request types (Criteria, Filter, Aggregation, Context)
//! - `plan/` - logical plan types (PlanNode, Expr, Column)
//! - `result/` - result types (StatsResult, AggregationResult, Record)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML → Schema
//! - `resolver/` - Schema + field path → ResolvedField
//! - `planner/` - Criteria + Aggregation → QueryPlan
//! - `emitter/` - QueryPlan → SQL
//! - `executor/` - SQL → rows
//! - `aggregator/` - rows → AggregatorResult
//!
//! # Example
//!
//! ```ignore
//! use shopdal::{parser, Context, Criteria, EntityRepository, SqliteConnection, StatsAggregation, StatsResult};
//!
//! let schema = parser::parse_file("schema.yaml")?;
//! let conn = SqliteConnection::open("shop.db")?;
//! let repository = EntityRepository::new(&schema, "tax", &conn)?;
//!
//! let mut criteria = Criteria::new();
//! criteria.add_aggregation(StatsAggregation::new("taxRate", "rate_agg"));
//! let result = repository.aggregate(&criteria, &Context::default())?;
//! let stats = result.get("rate_agg").and_then(|r| r.get::<StatsResult>(None));
//! ```

pub mod definition;
pub mod criteria;
pub mod plan;
pub mod result;
pub mod parser;
pub mod resolver;
pub mod planner;
pub mod emitter;
pub mod executor;
pub mod aggregator;
pub mod repository;
pub mod error;
pub mod logging;
pub mod value;

// Re-export commonly used types
pub use definition::{Association, AssociationKind, DataType, EntityDefinition, Field, Schema};
pub use criteria::{
    Aggregation, Context, Criteria, FieldAggregation, FieldSorting, Filter, RangeParameters,
    StatsAggregation,
};
pub use resolver::{resolve_field, ResolveError, ResolvedField};
pub use plan::{PlanNode, QueryPlan};
pub use planner::{plan_aggregation, plan_aggregations, plan_read, plan_search, plan_total, PlanError};
pub use emitter::{emit_sql, EmitError, SqlQuery};
pub use executor::{Connection, ExecuteError, RowSet, SqliteConnection};
pub use aggregator::EntityAggregator;
pub use repository::EntityRepository;
pub use result::{
    AggregationResult, AggregatorResult, GroupKey, Hydrate, HydrateError, IdSearchResult, Record,
    StatsResult,
};
pub use error::{DalError, ParseError};
pub use value::Value;
