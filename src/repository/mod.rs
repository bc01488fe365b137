//! Entity repository
//!
//! Entry point for application code: aggregate, search and read one entity.

use std::collections::HashMap;

use log::debug;

use crate::aggregator::EntityAggregator;
use crate::criteria::{Context, Criteria};
use crate::definition::{EntityDefinition, Schema};
use crate::emitter::emit_sql;
use crate::error::DalError;
use crate::executor::{Connection, ExecuteError};
use crate::planner::{plan_read, plan_search, plan_total, ID_ALIAS, TOTAL_ALIAS};
use crate::resolver::ResolveError;
use crate::result::{AggregatorResult, Hydrate, IdSearchResult, Record};
use crate::value::Value;

pub struct EntityRepository<'a, C: Connection + ?Sized> {
    schema: &'a Schema,
    definition: &'a EntityDefinition,
    connection: &'a C,
}

impl<'a, C: Connection + ?Sized> EntityRepository<'a, C> {
    pub fn new(schema: &'a Schema, entity: &str, connection: &'a C) -> Result<Self, DalError> {
        let definition = schema
            .get_entity(entity)
            .ok_or_else(|| ResolveError::EntityNotFound(entity.to_string()))?;
        Ok(Self {
            schema,
            definition,
            connection,
        })
    }

    pub fn definition(&self) -> &'a EntityDefinition {
        self.definition
    }

    pub fn aggregate(&self, criteria: &Criteria, context: &Context) -> Result<AggregatorResult, DalError> {
        EntityAggregator::new(self.schema, self.definition, self.connection).aggregate(criteria, context)
    }

    /// Primary keys matching the criteria, plus the unpaged total if `fetch_total` is set
    pub fn search(&self, criteria: &Criteria, context: &Context) -> Result<IdSearchResult, DalError> {
        let plan = plan_search(self.schema, self.definition, criteria, context)?;
        let rows = self.connection.fetch(&emit_sql(&plan)?)?;
        let ids = rows
            .iter()
            .map(|row| row.require(ID_ALIAS).map(Value::to_string))
            .collect::<Result<Vec<_>, ExecuteError>>()?;

        let total = if criteria.fetch_total {
            let plan = plan_total(self.schema, self.definition, criteria, context)?;
            let rows = self.connection.fetch(&emit_sql(&plan)?)?;
            let total = match rows.iter().next() {
                Some(row) => row.require(TOTAL_ALIAS)?.as_i64(),
                None => Some(0),
            };
            total
        } else {
            None
        };

        debug!("search on '{}' found {} ids", self.definition.name, ids.len());
        Ok(IdSearchResult { ids, total })
    }

    /// Records for the given primary keys, in the order of `ids`
    ///
    /// Unknown keys are skipped.
    pub fn read(&self, ids: &[String], context: &Context) -> Result<Vec<Record>, DalError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let plan = plan_read(self.schema, self.definition, ids, context)?;
        let rows = self.connection.fetch(&emit_sql(&plan)?)?;

        let mut records: Vec<Record> = rows
            .iter()
            .map(|row| {
                let mut record = Record::new(&self.definition.name);
                for (column, value) in row.columns().iter().zip(row.values()) {
                    let value = match self.definition.get_field(column) {
                        Some(field) => field.data_type.normalize(value.clone()),
                        None => value.clone(),
                    };
                    record.insert(column.as_str(), value);
                }
                record
            })
            .collect();

        if let Some(key_field) = self.definition.primary_key_field() {
            let position: HashMap<&str, usize> =
                ids.iter().enumerate().map(|(idx, id)| (id.as_str(), idx)).collect();
            records.sort_by_key(|record| {
                record
                    .get(&key_field.name)
                    .map(Value::to_string)
                    .and_then(|key| position.get(key.as_str()).copied())
                    .unwrap_or(usize::MAX)
            });
        }

        debug!("read {} of {} '{}' records", records.len(), ids.len(), self.definition.name);
        Ok(records)
    }

    /// Read and hydrate records into `T`
    pub fn read_into<T: Hydrate>(&self, ids: &[String], context: &Context) -> Result<Vec<T>, DalError> {
        self.read(ids, context)?
            .iter()
            .map(|record| T::hydrate(record).map_err(DalError::from))
            .collect()
    }
}
