//! Aggregation results

use serde::Serialize;

use crate::value::Value;
use super::group_key::GroupKey;

/// Computed statistics of one group; statistics that were not requested are `None`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResult {
    pub key: Option<GroupKey>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub sum: Option<f64>,
    pub count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvgResult {
    pub key: Option<GroupKey>,
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SumResult {
    pub key: Option<GroupKey>,
    pub sum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinResult {
    pub key: Option<GroupKey>,
    pub min: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxResult {
    pub key: Option<GroupKey>,
    pub max: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountResult {
    pub key: Option<GroupKey>,
    pub count: i64,
}

/// Number of distinct values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardinalityResult {
    pub key: Option<GroupKey>,
    pub cardinality: i64,
}

/// One distinct value and the number of root rows carrying it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCountItem {
    pub key: Value,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCountResult {
    pub key: Option<GroupKey>,
    pub values: Vec<ValueCountItem>,
}

impl ValueCountResult {
    /// Count of one distinct value, if it occurred
    pub fn count_of(&self, value: &Value) -> Option<i64> {
        self.values.iter().find(|item| &item.key == value).map(|item| item.count)
    }
}

/// Result rows of one aggregation, typed by aggregation kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "rows", rename_all = "camelCase")]
pub enum AggregationRows {
    Stats(Vec<StatsResult>),
    Avg(Vec<AvgResult>),
    Sum(Vec<SumResult>),
    Min(Vec<MinResult>),
    Max(Vec<MaxResult>),
    Count(Vec<CountResult>),
    Cardinality(Vec<CardinalityResult>),
    ValueCount(Vec<ValueCountResult>),
}

impl AggregationRows {
    pub fn len(&self) -> usize {
        match self {
            AggregationRows::Stats(rows) => rows.len(),
            AggregationRows::Avg(rows) => rows.len(),
            AggregationRows::Sum(rows) => rows.len(),
            AggregationRows::Min(rows) => rows.len(),
            AggregationRows::Max(rows) => rows.len(),
            AggregationRows::Count(rows) => rows.len(),
            AggregationRows::Cardinality(rows) => rows.len(),
            AggregationRows::ValueCount(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A typed result row that can be found by its group key
pub trait ResultRow: Sized {
    fn key(&self) -> Option<&GroupKey>;
    fn rows_of(rows: &AggregationRows) -> Option<&[Self]>;
}

macro_rules! result_row {
    ($row:ty, $variant:ident) => {
        impl ResultRow for $row {
            fn key(&self) -> Option<&GroupKey> {
                self.key.as_ref()
            }

            fn rows_of(rows: &AggregationRows) -> Option<&[Self]> {
                match rows {
                    AggregationRows::$variant(rows) => Some(rows),
                    _ => None,
                }
            }
        }
    };
}

result_row!(StatsResult, Stats);
result_row!(AvgResult, Avg);
result_row!(SumResult, Sum);
result_row!(MinResult, Min);
result_row!(MaxResult, Max);
result_row!(CountResult, Count);
result_row!(CardinalityResult, Cardinality);
result_row!(ValueCountResult, ValueCount);

/// The named result of one aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub name: String,
    #[serde(flatten)]
    pub rows: AggregationRows,
}

impl AggregationResult {
    pub fn new(name: impl Into<String>, rows: AggregationRows) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// All rows, if the aggregation produced rows of type `T`
    pub fn rows<T: ResultRow>(&self) -> Option<&[T]> {
        T::rows_of(&self.rows)
    }

    /// Row of a group; `None` as key selects the ungrouped row
    pub fn get<T: ResultRow>(&self, key: Option<&GroupKey>) -> Option<&T> {
        self.rows::<T>()?.iter().find(|row| row.key() == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Results of every aggregation of one criteria, in request order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatorResult {
    results: Vec<AggregationResult>,
}

impl AggregatorResult {
    pub fn new(results: Vec<AggregationResult>) -> Self {
        Self { results }
    }

    pub fn get(&self, name: &str) -> Option<&AggregationResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregationResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(key: Option<GroupKey>, min: f64) -> StatsResult {
        StatsResult {
            key,
            min: Some(min),
            max: None,
            avg: None,
            sum: None,
            count: None,
        }
    }

    #[test]
    fn test_get_by_group_key() {
        let cat1 = GroupKey::from([("categories.name", "cat1")]);
        let cat2 = GroupKey::from([("categories.name", "cat2")]);
        let result = AggregationResult::new(
            "prices",
            AggregationRows::Stats(vec![stats(Some(cat1.clone()), 10.0), stats(Some(cat2.clone()), 20.0)]),
        );

        assert_eq!(result.get::<StatsResult>(Some(&cat2)).and_then(|r| r.min), Some(20.0));
        assert!(result.get::<StatsResult>(None).is_none());
        assert!(result.get::<AvgResult>(Some(&cat1)).is_none());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_aggregator_result_lookup_by_name() {
        let results = AggregatorResult::new(vec![AggregationResult::new(
            "rates",
            AggregationRows::Count(vec![CountResult { key: None, count: 8 }]),
        )]);
        assert_eq!(results.get("rates").and_then(|r| r.get::<CountResult>(None)).map(|r| r.count), Some(8));
        assert!(results.get("missing").is_none());
    }

    #[test]
    fn test_unrequested_statistics_serialize_as_null() {
        let json = serde_json::to_value(stats(None, 10.0)).unwrap();
        assert_eq!(json["min"], serde_json::json!(10.0));
        assert!(json["max"].is_null());
        assert!(json.as_object().unwrap().contains_key("count"));
    }
}
