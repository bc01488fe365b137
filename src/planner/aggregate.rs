//! Aggregation planning
//!
//! One aggregation becomes one grouped (or ungrouped) SELECT over the root
//! entity, its criteria filters, and the joins its field paths need.

use std::collections::HashSet;

use crate::criteria::{Aggregation, Context, Criteria, StatsAggregation};
use crate::definition::{EntityDefinition, Schema};
use crate::plan::{
    Aggregate, AggregateExpr, AggregateFunction, Column, Expr, Filter, Params, PlanNode,
    ProjectExpr, QueryPlan, Sort, SortDirection, SortKey,
};
use crate::resolver::{resolve_field, ResolvedField};
use super::error::PlanError;
use super::filter::criteria_predicates;
use super::joins::{root_key, root_scan, JoinBuilder};

/// Output alias of the n-th group-by field
pub fn group_alias(index: usize) -> String {
    format!("g{}", index)
}

/// Output alias of the counted value of a value-count aggregation
pub const VALUE_ALIAS: &str = "value";

/// Validate and plan every aggregation of a criteria
///
/// Nothing is executed here, so a misconfigured aggregation fails before any
/// query reaches the store.
pub fn plan_aggregations<'c>(
    schema: &Schema,
    root: &EntityDefinition,
    criteria: &'c Criteria,
    context: &Context,
) -> Result<Vec<(&'c Aggregation, QueryPlan)>, PlanError> {
    let mut seen = HashSet::new();
    let mut plans = Vec::with_capacity(criteria.aggregations.len());
    for aggregation in &criteria.aggregations {
        if !seen.insert(aggregation.name()) {
            return Err(PlanError::DuplicateAggregation(aggregation.name().to_string()));
        }
        plans.push((aggregation, plan_aggregation(schema, root, criteria, aggregation, context)?));
    }
    Ok(plans)
}

/// Plan a single aggregation of a criteria
pub fn plan_aggregation(
    schema: &Schema,
    root: &EntityDefinition,
    criteria: &Criteria,
    aggregation: &Aggregation,
    context: &Context,
) -> Result<QueryPlan, PlanError> {
    if let Aggregation::Stats(stats) = aggregation {
        if !stats.fetches_anything() {
            return Err(PlanError::StatsWithoutFetch {
                name: stats.name.clone(),
            });
        }
    }

    let field = resolve_field(schema, root, aggregation.field())?;
    check_numeric(aggregation, &field)?;
    let groups = aggregation
        .group_by_fields()
        .iter()
        .map(|path| resolve_field(schema, root, path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut params = Params::new();
    let mut joins = JoinBuilder::new(context);
    joins.add_path(&field, &mut params);
    for group in &groups {
        joins.add_path(group, &mut params);
    }

    // Filters over the joins this aggregation reads anyway restrict its rows
    let inline_aliases: HashSet<String> = std::iter::once(&field)
        .chain(groups.iter())
        .flat_map(|f| f.to_many_aliases())
        .map(str::to_string)
        .collect();
    let predicates = criteria_predicates(schema, root, criteria, &inline_aliases, &mut joins, &mut params)?;

    let value = joins.field_expr(&field);
    let mut group_by: Vec<ProjectExpr> = groups
        .iter()
        .enumerate()
        .map(|(idx, group)| ProjectExpr::new(joins.field_expr(group), group_alias(idx)))
        .collect();

    let aggregates = match aggregation {
        Aggregation::Stats(stats) => stats_aggregates(stats, &value),
        Aggregation::Avg(_) => vec![AggregateExpr::new(AggregateFunction::Avg, value, "avg")],
        Aggregation::Sum(_) => vec![AggregateExpr::new(AggregateFunction::Sum, value, "sum")],
        Aggregation::Min(_) => vec![AggregateExpr::new(AggregateFunction::Min, value, "min")],
        Aggregation::Max(_) => vec![AggregateExpr::new(AggregateFunction::Max, value, "max")],
        Aggregation::Count(_) => vec![AggregateExpr::new(AggregateFunction::Count, value, "count")],
        Aggregation::Cardinality(_) => {
            vec![AggregateExpr::new(AggregateFunction::CountDistinct, value, "cardinality")]
        }
        Aggregation::ValueCount(_) => {
            group_by.push(ProjectExpr::new(value, VALUE_ALIAS));
            vec![AggregateExpr::new(AggregateFunction::CountDistinct, root_key(root), "count")]
        }
    };

    let mut input = joins.build(root_scan(root));
    if let Some(predicate) = Expr::conjunction(predicates) {
        input = PlanNode::Filter(Filter {
            input: Box::new(input),
            predicate,
        });
    }

    let sort_keys: Vec<SortKey> = group_by
        .iter()
        .map(|group| SortKey {
            expr: Expr::Column(Column::unqualified(&group.alias)),
            direction: SortDirection::Ascending,
        })
        .collect();

    let mut root_node = PlanNode::Aggregate(Aggregate {
        input: Box::new(input),
        group_by,
        aggregates,
    });
    if !sort_keys.is_empty() {
        root_node = PlanNode::Sort(Sort {
            input: Box::new(root_node),
            sort_keys,
        });
    }

    Ok(QueryPlan {
        root: root_node,
        params,
    })
}

fn stats_aggregates(stats: &StatsAggregation, value: &Expr) -> Vec<AggregateExpr> {
    [
        (stats.fetch_min, AggregateFunction::Min, "min"),
        (stats.fetch_max, AggregateFunction::Max, "max"),
        (stats.fetch_avg, AggregateFunction::Avg, "avg"),
        (stats.fetch_sum, AggregateFunction::Sum, "sum"),
        (stats.fetch_count, AggregateFunction::Count, "count"),
    ]
    .into_iter()
    .filter(|(fetch, _, _)| *fetch)
    .map(|(_, func, alias)| AggregateExpr::new(func, value.clone(), alias))
    .collect()
}

fn check_numeric(aggregation: &Aggregation, field: &ResolvedField<'_>) -> Result<(), PlanError> {
    let needs_numeric = match aggregation {
        Aggregation::Avg(_) | Aggregation::Sum(_) => true,
        Aggregation::Stats(stats) => {
            stats.fetch_min || stats.fetch_max || stats.fetch_avg || stats.fetch_sum
        }
        _ => false,
    };
    if needs_numeric && !field.is_numeric() {
        return Err(PlanError::NonNumericField {
            name: aggregation.name().to_string(),
            field: field.path.clone(),
            data_type: field.data_type().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Filter as CriteriaFilter;
    use crate::emitter::emit_sql;
    use crate::parser::parse_str;

    const SCHEMA: &str = r#"
entities:
  - name: tax
    fields:
      - { name: id, column: uuid }
      - { name: taxRate, type: f64 }
      - { name: name }
  - name: product
    fields:
      - { name: id, column: uuid }
      - { name: price, type: json }
    associations:
      - { name: categories, reference: category, kind: many_to_many, mapping: product_category, localColumn: product_uuid, referenceColumn: category_uuid }
  - name: category
    fields:
      - { name: id, column: uuid }
      - { name: name, translated: true }
"#;

    fn stats_criteria(stats: StatsAggregation) -> Criteria {
        let mut criteria = Criteria::new();
        criteria.add_aggregation(stats);
        criteria
    }

    #[test]
    fn test_stats_without_fetch_fails_before_planning_sql() {
        let schema = parse_str(SCHEMA).unwrap();
        let tax = schema.get_entity("tax").unwrap();
        let criteria = stats_criteria(StatsAggregation::empty("taxRate", "rate_agg"));

        let err = plan_aggregations(&schema, tax, &criteria, &Context::default()).unwrap_err();
        assert_eq!(err.to_string(), "StatsAggregation configured without fetch: 'rate_agg'");
    }

    #[test]
    fn test_stats_selects_requested_statistics_only() {
        let schema = parse_str(SCHEMA).unwrap();
        let tax = schema.get_entity("tax").unwrap();
        let criteria = stats_criteria(StatsAggregation::empty("taxRate", "rate_agg").with_min(true).with_count(true));

        let plans = plan_aggregations(&schema, tax, &criteria, &Context::default()).unwrap();
        let sql = emit_sql(&plans[0].1).unwrap().sql;
        assert_eq!(
            sql,
            "SELECT MIN(\"tax\".\"tax_rate\") AS \"min\", COUNT(\"tax\".\"tax_rate\") AS \"count\"\nFROM \"tax\""
        );
    }

    #[test]
    fn test_avg_over_text_field_is_rejected() {
        let schema = parse_str(SCHEMA).unwrap();
        let tax = schema.get_entity("tax").unwrap();
        let criteria = stats_criteria(StatsAggregation::new("name", "names"));

        let err = plan_aggregations(&schema, tax, &criteria, &Context::default()).unwrap_err();
        assert!(matches!(err, PlanError::NonNumericField { .. }));

        let count_only = stats_criteria(StatsAggregation::empty("name", "names").with_count(true));
        assert!(plan_aggregations(&schema, tax, &count_only, &Context::default()).is_ok());

        let mut min = Criteria::new();
        min.add_aggregation(Aggregation::min("name", "first_name"));
        assert!(plan_aggregations(&schema, tax, &min, &Context::default()).is_ok());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let schema = parse_str(SCHEMA).unwrap();
        let tax = schema.get_entity("tax").unwrap();
        let mut criteria = Criteria::new();
        criteria.add_aggregation(Aggregation::avg("taxRate", "rate"));
        criteria.add_aggregation(Aggregation::max("taxRate", "rate"));

        let err = plan_aggregations(&schema, tax, &criteria, &Context::default()).unwrap_err();
        assert!(matches!(err, PlanError::DuplicateAggregation(name) if name == "rate"));
    }

    #[test]
    fn test_grouped_stats_filter_inline_on_group_join() {
        let schema = parse_str(SCHEMA).unwrap();
        let product = schema.get_entity("product").unwrap();
        let mut criteria = stats_criteria(StatsAggregation::new("price.gross", "prices").group_by("categories.name"));
        criteria.add_filter(CriteriaFilter::equals_any("categories.id", ["c1", "c2"]));

        let plans = plan_aggregations(&schema, product, &criteria, &Context::default()).unwrap();
        let sql = emit_sql(&plans[0].1).unwrap().sql;
        assert!(sql.contains("\"product.categories.translation\".\"name\" AS \"g0\""), "{}", sql);
        assert!(sql.contains("WHERE \"product.categories\".\"uuid\" IN (:p0, :p1)"), "{}", sql);
        assert!(sql.contains("AVG(json_extract(\"product\".\"price\", '$.gross')) AS \"avg\""), "{}", sql);
        assert!(sql.ends_with("ORDER BY \"g0\" ASC"), "{}", sql);
    }

    #[test]
    fn test_ungrouped_stats_filter_through_subquery() {
        let schema = parse_str(SCHEMA).unwrap();
        let product = schema.get_entity("product").unwrap();
        let mut criteria = stats_criteria(StatsAggregation::new("price.gross", "prices"));
        criteria.add_filter(CriteriaFilter::equals_any("categories.id", ["c1"]));

        let plans = plan_aggregations(&schema, product, &criteria, &Context::default()).unwrap();
        let sql = emit_sql(&plans[0].1).unwrap().sql;
        assert!(sql.contains("WHERE \"product\".\"uuid\" IN (\n  SELECT \"product\".\"uuid\" AS \"id\""), "{}", sql);
        assert!(!sql.contains("GROUP BY"));
    }
}
