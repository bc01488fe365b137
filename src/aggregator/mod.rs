//! Aggregation execution (verb module)
//!
//! Plans every aggregation of a criteria, runs the emitted queries and
//! reshapes the rows into typed results.

mod reshape;

pub use reshape::{reshape, ColumnTypes};

use log::debug;

use crate::criteria::{Aggregation, Context, Criteria};
use crate::definition::{DataType, EntityDefinition, Schema};
use crate::emitter::emit_sql;
use crate::error::DalError;
use crate::executor::Connection;
use crate::planner::plan_aggregations;
use crate::resolver::{resolve_field, ResolveError};
use crate::result::AggregatorResult;

/// Runs the aggregations of a criteria against one root entity
pub struct EntityAggregator<'a, C: Connection + ?Sized> {
    schema: &'a Schema,
    definition: &'a EntityDefinition,
    connection: &'a C,
}

impl<'a, C: Connection + ?Sized> EntityAggregator<'a, C> {
    pub fn new(schema: &'a Schema, definition: &'a EntityDefinition, connection: &'a C) -> Self {
        Self {
            schema,
            definition,
            connection,
        }
    }

    /// Compute every aggregation of `criteria`
    ///
    /// All aggregations are planned and emitted before the first query runs,
    /// so a misconfigured aggregation fails without touching the store.
    pub fn aggregate(&self, criteria: &Criteria, context: &Context) -> Result<AggregatorResult, DalError> {
        let plans = plan_aggregations(self.schema, self.definition, criteria, context)?;
        let mut queries = Vec::with_capacity(plans.len());
        for (aggregation, plan) in plans {
            let types = self.column_types(aggregation)?;
            queries.push((aggregation, types, emit_sql(&plan)?));
        }

        let mut results = Vec::with_capacity(queries.len());
        for (aggregation, types, query) in queries {
            debug!(
                "{} aggregation '{}' on '{}'",
                aggregation.kind(),
                aggregation.name(),
                self.definition.name
            );
            let rows = self.connection.fetch(&query)?;
            results.push(reshape(aggregation, &types, &rows)?);
        }
        Ok(AggregatorResult::new(results))
    }

    fn column_types(&self, aggregation: &Aggregation) -> Result<ColumnTypes, ResolveError> {
        let value_type = |path: &str| -> Result<Option<DataType>, ResolveError> {
            Ok(resolve_field(self.schema, self.definition, path)?.value_type().cloned())
        };
        let groups = aggregation
            .group_by_fields()
            .iter()
            .map(|path| value_type(path.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ColumnTypes {
            field: value_type(aggregation.field())?,
            groups,
        })
    }
}
