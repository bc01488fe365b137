use serde::Deserialize;

use super::aggregation::Aggregation;
use super::filter::Filter;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

/// Sort by a field path
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSorting {
    pub field: String,
    #[serde(default)]
    pub order: SortDirection,
}

impl FieldSorting {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: SortDirection::Ascending }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: SortDirection::Descending }
    }
}

/// Declarative query: filters, aggregations, sorting and paging.
///
/// All filters are combined with AND. `ids` restricts the root entity to the
/// given primary keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(default)]
    pub ids: Vec<String>,
    #[serde(default, rename = "filter")]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
    #[serde(default, rename = "sort")]
    pub sortings: Vec<FieldSorting>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    /// Compute the number of matches ignoring limit/offset
    #[serde(default)]
    pub fetch_total: bool,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn add_aggregation(&mut self, aggregation: impl Into<Aggregation>) -> &mut Self {
        self.aggregations.push(aggregation.into());
        self
    }

    pub fn add_sorting(&mut self, sorting: FieldSorting) -> &mut Self {
        self.sortings.push(sorting);
        self
    }

    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn set_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn set_fetch_total(&mut self, fetch_total: bool) -> &mut Self {
        self.fetch_total = fetch_total;
        self
    }

    pub fn get_aggregation(&self, name: &str) -> Option<&Aggregation> {
        self.aggregations.iter().find(|a| a.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::StatsAggregation;

    #[test]
    fn test_builder_chain() {
        let mut criteria = Criteria::with_ids(["a", "b"]);
        criteria
            .add_filter(Filter::equals("active", true))
            .add_aggregation(StatsAggregation::new("price.gross", "price_stats"))
            .add_sorting(FieldSorting::descending("price.gross"))
            .set_limit(10);

        assert_eq!(criteria.ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(criteria.filters.len(), 1);
        assert!(criteria.get_aggregation("price_stats").is_some());
        assert_eq!(criteria.sortings[0].order, SortDirection::Descending);
        assert_eq!(criteria.limit, Some(10));
    }

    #[test]
    fn test_deserialize_request_body() {
        let json = r#"{
            "filter": [{"type": "equalsAny", "field": "product.categories.id", "value": ["c1"]}],
            "aggregations": [
                {"type": "stats", "field": "product.price.gross", "name": "stats_agg",
                 "groupByFields": ["product.categories.name"]}
            ],
            "sort": [{"field": "product.price.gross", "order": "DESC"}],
            "limit": 5,
            "fetchTotal": true
        }"#;
        let criteria: Criteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.filters.len(), 1);
        assert_eq!(criteria.aggregations[0].group_by_fields(), ["product.categories.name".to_string()]);
        assert_eq!(criteria.sortings[0], FieldSorting::descending("product.price.gross"));
        assert_eq!(criteria.limit, Some(5));
        assert!(criteria.fetch_total);
    }
}
