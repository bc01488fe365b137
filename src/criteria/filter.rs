//! Filter predicates over field paths

use serde::Deserialize;

use crate::value::Value;

/// How the queries of a multi filter are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiOperator {
    #[default]
    And,
    Or,
}

/// Bounds of a range filter; unset bounds are ignored
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RangeParameters {
    #[serde(default)]
    pub gt: Option<Value>,
    #[serde(default)]
    pub gte: Option<Value>,
    #[serde(default)]
    pub lt: Option<Value>,
    #[serde(default)]
    pub lte: Option<Value>,
}

/// A predicate over one or more field paths
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Filter {
    /// `field = value`; a null value matches missing values
    Equals { field: String, value: Value },
    /// `field IN (values)`
    EqualsAny { field: String, value: Vec<Value> },
    /// Substring match
    Contains { field: String, value: String },
    Range {
        field: String,
        #[serde(default)]
        parameters: RangeParameters,
    },
    /// Negation of the combined queries
    Not {
        #[serde(default)]
        operator: MultiOperator,
        queries: Vec<Filter>,
    },
    Multi {
        #[serde(default)]
        operator: MultiOperator,
        queries: Vec<Filter>,
    },
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equals { field: field.into(), value: value.into() }
    }

    pub fn equals_any<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::EqualsAny {
            field: field.into(),
            value: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Contains { field: field.into(), value: value.into() }
    }

    pub fn range(field: impl Into<String>, parameters: RangeParameters) -> Self {
        Filter::Range { field: field.into(), parameters }
    }

    pub fn not(queries: Vec<Filter>) -> Self {
        Filter::Not { operator: MultiOperator::And, queries }
    }

    pub fn and(queries: Vec<Filter>) -> Self {
        Filter::Multi { operator: MultiOperator::And, queries }
    }

    pub fn or(queries: Vec<Filter>) -> Self {
        Filter::Multi { operator: MultiOperator::Or, queries }
    }

    /// Every field path the filter reads, in order of appearance
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Filter::Equals { field, .. }
            | Filter::EqualsAny { field, .. }
            | Filter::Contains { field, .. }
            | Filter::Range { field, .. } => out.push(field),
            Filter::Not { queries, .. } | Filter::Multi { queries, .. } => {
                for query in queries {
                    query.collect_fields(out);
                }
            }
        }
    }
}

impl RangeParameters {
    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.lte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.lt = Some(value.into());
        self
    }
}
