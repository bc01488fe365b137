//! Reshape fetched aggregation rows into typed results

use crate::criteria::{Aggregation, StatsAggregation};
use crate::definition::DataType;
use crate::executor::{ExecuteError, Row, RowSet};
use crate::planner::{group_alias, VALUE_ALIAS};
use crate::result::{
    AggregationResult, AggregationRows, AvgResult, CardinalityResult, CountResult, GroupKey,
    MaxResult, MinResult, StatsResult, SumResult, ValueCountItem, ValueCountResult,
};
use crate::value::Value;

/// Declared types of an aggregation's field and group-by fields
///
/// `None` marks a path whose type is unknown (a JSON accessor); its values
/// are kept as read.
#[derive(Debug, Clone, Default)]
pub struct ColumnTypes {
    pub field: Option<DataType>,
    pub groups: Vec<Option<DataType>>,
}

impl ColumnTypes {
    fn field_value(&self, value: &Value) -> Value {
        normalize(self.field.as_ref(), value)
    }

    fn group_value(&self, idx: usize, value: &Value) -> Value {
        normalize(self.groups.get(idx).and_then(Option::as_ref), value)
    }
}

/// Build the typed result of an aggregation from its rows
pub fn reshape(
    aggregation: &Aggregation,
    types: &ColumnTypes,
    rows: &RowSet,
) -> Result<AggregationResult, ExecuteError> {
    let groups = &Groups {
        fields: aggregation.group_by_fields(),
        types,
    };
    let result_rows = match aggregation {
        Aggregation::Stats(stats) => AggregationRows::Stats(collect(rows, |row| stats_row(stats, groups, row))?),
        Aggregation::Avg(_) => AggregationRows::Avg(collect(rows, |row| {
            Ok(AvgResult {
                key: group_key(groups, row)?,
                avg: row.require("avg")?.as_f64(),
            })
        })?),
        Aggregation::Sum(_) => AggregationRows::Sum(collect(rows, |row| {
            Ok(SumResult {
                key: group_key(groups, row)?,
                sum: row.require("sum")?.as_f64(),
            })
        })?),
        Aggregation::Min(_) => AggregationRows::Min(collect(rows, |row| {
            Ok(MinResult {
                key: group_key(groups, row)?,
                min: non_null(row.require("min")?),
            })
        })?),
        Aggregation::Max(_) => AggregationRows::Max(collect(rows, |row| {
            Ok(MaxResult {
                key: group_key(groups, row)?,
                max: non_null(row.require("max")?),
            })
        })?),
        Aggregation::Count(_) => AggregationRows::Count(collect(rows, |row| {
            Ok(CountResult {
                key: group_key(groups, row)?,
                count: row.require("count")?.as_i64().unwrap_or(0),
            })
        })?),
        Aggregation::Cardinality(_) => AggregationRows::Cardinality(collect(rows, |row| {
            Ok(CardinalityResult {
                key: group_key(groups, row)?,
                cardinality: row.require("cardinality")?.as_i64().unwrap_or(0),
            })
        })?),
        Aggregation::ValueCount(_) => AggregationRows::ValueCount(value_counts(groups, rows)?),
    };
    Ok(AggregationResult::new(aggregation.name(), result_rows))
}

fn collect<T>(
    rows: &RowSet,
    f: impl Fn(Row<'_>) -> Result<T, ExecuteError>,
) -> Result<Vec<T>, ExecuteError> {
    rows.iter().map(f).collect()
}

fn stats_row(stats: &StatsAggregation, groups: &Groups<'_>, row: Row<'_>) -> Result<StatsResult, ExecuteError> {
    let stat = |fetch: bool, column: &str| -> Result<Option<f64>, ExecuteError> {
        if fetch {
            Ok(row.require(column)?.as_f64())
        } else {
            Ok(None)
        }
    };
    Ok(StatsResult {
        key: group_key(groups, row)?,
        min: stat(stats.fetch_min, "min")?,
        max: stat(stats.fetch_max, "max")?,
        avg: stat(stats.fetch_avg, "avg")?,
        sum: stat(stats.fetch_sum, "sum")?,
        count: if stats.fetch_count {
            row.require("count")?.as_i64()
        } else {
            None
        },
    })
}

/// Rows arrive sorted by group key, so each group's values are adjacent
fn value_counts(groups: &Groups<'_>, rows: &RowSet) -> Result<Vec<ValueCountResult>, ExecuteError> {
    let mut results: Vec<ValueCountResult> = Vec::new();
    for row in rows.iter() {
        let key = group_key(groups, row)?;
        let item = ValueCountItem {
            key: groups.types.field_value(row.require(VALUE_ALIAS)?),
            count: row.require("count")?.as_i64().unwrap_or(0),
        };
        match results.last_mut() {
            Some(last) if last.key == key => last.values.push(item),
            _ => results.push(ValueCountResult {
                key,
                values: vec![item],
            }),
        }
    }
    if groups.fields.is_empty() && results.is_empty() {
        results.push(ValueCountResult {
            key: None,
            values: Vec::new(),
        });
    }
    Ok(results)
}

/// Group-by paths of an aggregation with their declared types
struct Groups<'a> {
    fields: &'a [String],
    types: &'a ColumnTypes,
}

fn group_key(groups: &Groups<'_>, row: Row<'_>) -> Result<Option<GroupKey>, ExecuteError> {
    if groups.fields.is_empty() {
        return Ok(None);
    }
    let mut key = GroupKey::new();
    for (idx, field) in groups.fields.iter().enumerate() {
        let value = row.require(&group_alias(idx))?;
        key.push(field.as_str(), groups.types.group_value(idx, value));
    }
    Ok(Some(key))
}

fn normalize(data_type: Option<&DataType>, value: &Value) -> Value {
    match data_type {
        Some(data_type) => data_type.normalize(value.clone()),
        None => value.clone(),
    }
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_set(columns: &[&str], rows: Vec<Vec<Value>>) -> RowSet {
        RowSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn test_stats_nulls_unrequested_statistics() {
        let stats = StatsAggregation::empty("taxRate", "rates").with_max(true).with_count(true);
        let rows = row_set(&["max", "count"], vec![vec![Value::Float(90.0), Value::Integer(8)]]);

        let result = reshape(&Aggregation::Stats(stats), &ColumnTypes::default(), &rows).unwrap();
        let row = result.get::<StatsResult>(None).unwrap();
        assert_eq!(row.max, Some(90.0));
        assert_eq!(row.count, Some(8));
        assert_eq!(row.min, None);
        assert_eq!(row.avg, None);
        assert_eq!(row.sum, None);
    }

    #[test]
    fn test_grouped_rows_carry_group_keys() {
        let agg = Aggregation::sum("price.gross", "prices").group_by("categories.name");
        let rows = row_set(
            &["g0", "sum"],
            vec![
                vec![Value::from("cat1"), Value::Integer(40)],
                vec![Value::from("cat2"), Value::Float(160.0)],
            ],
        );

        let result = reshape(&agg, &ColumnTypes::default(), &rows).unwrap();
        let key = GroupKey::from([("categories.name", "cat2")]);
        assert_eq!(result.get::<SumResult>(Some(&key)).and_then(|r| r.sum), Some(160.0));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_value_counts_fold_per_group() {
        let agg = Aggregation::value_count("manufacturer.id", "makers").group_by("active");
        let rows = row_set(
            &["g0", "value", "count"],
            vec![
                vec![Value::Integer(0), Value::from("m2"), Value::Integer(1)],
                vec![Value::Integer(1), Value::from("m1"), Value::Integer(3)],
                vec![Value::Integer(1), Value::from("m2"), Value::Integer(2)],
            ],
        );

        let types = ColumnTypes {
            field: Some(DataType::String),
            groups: vec![Some(DataType::Bool)],
        };
        let result = reshape(&agg, &types, &rows).unwrap();
        let active = result
            .get::<ValueCountResult>(Some(&GroupKey::from([("active", true)])))
            .unwrap();
        assert_eq!(active.count_of(&Value::from("m1")), Some(3));
        assert_eq!(active.count_of(&Value::from("m2")), Some(2));
        assert_eq!(result.len(), 2);
        assert!(result
            .get::<ValueCountResult>(Some(&GroupKey::from([("active", Value::Integer(1))])))
            .is_none());
    }

    #[test]
    fn test_untyped_group_values_are_kept() {
        let agg = Aggregation::count("id", "products").group_by("price.gross");
        let rows = row_set(&["g0", "count"], vec![vec![Value::Integer(1), Value::Integer(2)]]);
        let types = ColumnTypes {
            field: Some(DataType::String),
            groups: vec![None],
        };

        let result = reshape(&agg, &types, &rows).unwrap();
        let key = GroupKey::from([("price.gross", Value::Integer(1))]);
        assert_eq!(result.get::<CountResult>(Some(&key)).map(|r| r.count), Some(2));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let agg = Aggregation::avg("taxRate", "rates");
        let rows = row_set(&["sum"], vec![vec![Value::Integer(1)]]);
        assert!(matches!(reshape(&agg, &ColumnTypes::default(), &rows), Err(ExecuteError::MissingColumn(c)) if c == "avg"));
    }
}
