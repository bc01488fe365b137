//! Aggregation requests

use serde::Deserialize;

fn default_true() -> bool {
    true
}

/// Min/max/avg/sum/count over a numeric field, optionally grouped.
///
/// All statistics are fetched by default. Statistics switched off are
/// reported as null in the result rather than left out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsAggregation {
    pub field: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub fetch_min: bool,
    #[serde(default = "default_true")]
    pub fetch_max: bool,
    #[serde(default = "default_true")]
    pub fetch_avg: bool,
    #[serde(default = "default_true")]
    pub fetch_sum: bool,
    #[serde(default = "default_true")]
    pub fetch_count: bool,
    #[serde(default)]
    pub group_by_fields: Vec<String>,
}

impl StatsAggregation {
    pub fn new(field: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            name: name.into(),
            fetch_min: true,
            fetch_max: true,
            fetch_avg: true,
            fetch_sum: true,
            fetch_count: true,
            group_by_fields: Vec::new(),
        }
    }

    /// Same as `new` but with every statistic switched off
    pub fn empty(field: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(field, name)
            .with_min(false)
            .with_max(false)
            .with_avg(false)
            .with_sum(false)
            .with_count(false)
    }

    pub fn with_min(mut self, fetch: bool) -> Self {
        self.fetch_min = fetch;
        self
    }

    pub fn with_max(mut self, fetch: bool) -> Self {
        self.fetch_max = fetch;
        self
    }

    pub fn with_avg(mut self, fetch: bool) -> Self {
        self.fetch_avg = fetch;
        self
    }

    pub fn with_sum(mut self, fetch: bool) -> Self {
        self.fetch_sum = fetch;
        self
    }

    pub fn with_count(mut self, fetch: bool) -> Self {
        self.fetch_count = fetch;
        self
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by_fields.push(field.into());
        self
    }

    /// Is at least one statistic requested?
    pub fn fetches_anything(&self) -> bool {
        self.fetch_min || self.fetch_max || self.fetch_avg || self.fetch_sum || self.fetch_count
    }
}

/// A single-value aggregation over one field (avg, sum, min, ...)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAggregation {
    pub field: String,
    pub name: String,
    #[serde(default)]
    pub group_by_fields: Vec<String>,
}

impl FieldAggregation {
    pub fn new(field: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            name: name.into(),
            group_by_fields: Vec::new(),
        }
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_by_fields.push(field.into());
        self
    }
}

/// Any aggregation a criteria can carry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Aggregation {
    Stats(StatsAggregation),
    Avg(FieldAggregation),
    Sum(FieldAggregation),
    Min(FieldAggregation),
    Max(FieldAggregation),
    /// Number of non-null values
    Count(FieldAggregation),
    /// Number of distinct values
    Cardinality(FieldAggregation),
    /// Number of rows per distinct value
    ValueCount(FieldAggregation),
}

impl Aggregation {
    pub fn avg(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::Avg(FieldAggregation::new(field, name))
    }

    pub fn sum(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::Sum(FieldAggregation::new(field, name))
    }

    pub fn min(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::Min(FieldAggregation::new(field, name))
    }

    pub fn max(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::Max(FieldAggregation::new(field, name))
    }

    pub fn count(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::Count(FieldAggregation::new(field, name))
    }

    pub fn cardinality(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::Cardinality(FieldAggregation::new(field, name))
    }

    pub fn value_count(field: impl Into<String>, name: impl Into<String>) -> Self {
        Aggregation::ValueCount(FieldAggregation::new(field, name))
    }

    /// Add a group-by field to any aggregation kind
    pub fn group_by(self, field: impl Into<String>) -> Self {
        match self {
            Aggregation::Stats(a) => Aggregation::Stats(a.group_by(field)),
            Aggregation::Avg(a) => Aggregation::Avg(a.group_by(field)),
            Aggregation::Sum(a) => Aggregation::Sum(a.group_by(field)),
            Aggregation::Min(a) => Aggregation::Min(a.group_by(field)),
            Aggregation::Max(a) => Aggregation::Max(a.group_by(field)),
            Aggregation::Count(a) => Aggregation::Count(a.group_by(field)),
            Aggregation::Cardinality(a) => Aggregation::Cardinality(a.group_by(field)),
            Aggregation::ValueCount(a) => Aggregation::ValueCount(a.group_by(field)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Aggregation::Stats(a) => &a.name,
            Aggregation::Avg(a)
            | Aggregation::Sum(a)
            | Aggregation::Min(a)
            | Aggregation::Max(a)
            | Aggregation::Count(a)
            | Aggregation::Cardinality(a)
            | Aggregation::ValueCount(a) => &a.name,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Aggregation::Stats(a) => &a.field,
            Aggregation::Avg(a)
            | Aggregation::Sum(a)
            | Aggregation::Min(a)
            | Aggregation::Max(a)
            | Aggregation::Count(a)
            | Aggregation::Cardinality(a)
            | Aggregation::ValueCount(a) => &a.field,
        }
    }

    pub fn group_by_fields(&self) -> &[String] {
        match self {
            Aggregation::Stats(a) => &a.group_by_fields,
            Aggregation::Avg(a)
            | Aggregation::Sum(a)
            | Aggregation::Min(a)
            | Aggregation::Max(a)
            | Aggregation::Count(a)
            | Aggregation::Cardinality(a)
            | Aggregation::ValueCount(a) => &a.group_by_fields,
        }
    }

    /// Short kind label used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Aggregation::Stats(_) => "stats",
            Aggregation::Avg(_) => "avg",
            Aggregation::Sum(_) => "sum",
            Aggregation::Min(_) => "min",
            Aggregation::Max(_) => "max",
            Aggregation::Count(_) => "count",
            Aggregation::Cardinality(_) => "cardinality",
            Aggregation::ValueCount(_) => "value_count",
        }
    }
}

impl From<StatsAggregation> for Aggregation {
    fn from(aggregation: StatsAggregation) -> Self {
        Aggregation::Stats(aggregation)
    }
}
