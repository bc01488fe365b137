//! Search and read planning

use std::collections::HashSet;

use crate::criteria::{Context, Criteria, SortDirection as CriteriaDirection};
use crate::definition::{EntityDefinition, Schema};
use crate::plan::{
    Aggregate, AggregateExpr, AggregateFunction, Expr, Filter, Limit, Literal, Params, PlanNode,
    Project, ProjectExpr, QueryPlan, Sort, SortDirection, SortKey,
};
use crate::resolver::{resolve_field, ResolvedField};
use super::error::PlanError;
use super::filter::{criteria_predicates, ids_predicate};
use super::joins::{root_key, root_scan, JoinBuilder};

/// Output alias of the primary key in search plans
pub const ID_ALIAS: &str = "id";
/// Output alias of the row count in total plans
pub const TOTAL_ALIAS: &str = "total";

/// Plan the primary keys matching a criteria, sorted and paged
///
/// Sortings are restricted to to-one paths; the primary key is always the
/// last sort key so paging is stable.
pub fn plan_search(
    schema: &Schema,
    root: &EntityDefinition,
    criteria: &Criteria,
    context: &Context,
) -> Result<QueryPlan, PlanError> {
    let mut params = Params::new();
    let mut joins = JoinBuilder::new(context);

    let mut sort_keys = Vec::with_capacity(criteria.sortings.len() + 1);
    for sorting in &criteria.sortings {
        let field = resolve_field(schema, root, &sorting.field)?;
        if field.is_to_many() {
            return Err(PlanError::ToManySorting(sorting.field.clone()));
        }
        joins.add_path(&field, &mut params);
        sort_keys.push(SortKey {
            expr: joins.field_expr(&field),
            direction: match sorting.order {
                CriteriaDirection::Ascending => SortDirection::Ascending,
                CriteriaDirection::Descending => SortDirection::Descending,
            },
        });
    }
    sort_keys.push(SortKey {
        expr: root_key(root),
        direction: SortDirection::Ascending,
    });

    let predicates = criteria_predicates(schema, root, criteria, &HashSet::new(), &mut joins, &mut params)?;
    let input = filtered(joins.build(root_scan(root)), predicates);

    let mut node = PlanNode::Sort(Sort {
        input: Box::new(PlanNode::Project(Project {
            input: Box::new(input),
            expressions: vec![ProjectExpr::new(root_key(root), ID_ALIAS)],
        })),
        sort_keys,
    });
    if criteria.limit.is_some() || criteria.offset.unwrap_or(0) > 0 {
        node = PlanNode::Limit(Limit {
            input: Box::new(node),
            limit: criteria.limit,
            offset: criteria.offset.unwrap_or(0),
        });
    }

    Ok(QueryPlan { root: node, params })
}

/// Plan the number of root rows matching a criteria, ignoring paging
pub fn plan_total(
    schema: &Schema,
    root: &EntityDefinition,
    criteria: &Criteria,
    context: &Context,
) -> Result<QueryPlan, PlanError> {
    let mut params = Params::new();
    let mut joins = JoinBuilder::new(context);
    let predicates = criteria_predicates(schema, root, criteria, &HashSet::new(), &mut joins, &mut params)?;
    let input = filtered(joins.build(root_scan(root)), predicates);

    let node = PlanNode::Aggregate(Aggregate {
        input: Box::new(input),
        group_by: vec![],
        aggregates: vec![AggregateExpr::new(
            AggregateFunction::CountAll,
            Expr::Literal(Literal::Null),
            TOTAL_ALIAS,
        )],
    });
    Ok(QueryPlan { root: node, params })
}

/// Plan reading every field of the rows with the given primary keys
///
/// Each field is selected under its property name; translated fields read
/// through the context language. Row order is unspecified.
pub fn plan_read(
    schema: &Schema,
    root: &EntityDefinition,
    ids: &[String],
    context: &Context,
) -> Result<QueryPlan, PlanError> {
    let mut params = Params::new();
    let mut joins = JoinBuilder::new(context);

    let fields = root
        .fields
        .iter()
        .map(|field| resolve_field(schema, root, &field.name))
        .collect::<Result<Vec<ResolvedField<'_>>, _>>()?;
    for field in &fields {
        joins.add_path(field, &mut params);
    }
    let expressions = fields
        .iter()
        .map(|field| ProjectExpr::new(joins.field_expr(field), &field.field.name))
        .collect();

    let predicate = ids_predicate(root, ids, &mut params);
    let input = filtered(joins.build(root_scan(root)), vec![predicate]);
    let node = PlanNode::Project(Project {
        input: Box::new(input),
        expressions,
    });
    Ok(QueryPlan { root: node, params })
}

fn filtered(input: PlanNode, predicates: Vec<Expr>) -> PlanNode {
    match Expr::conjunction(predicates) {
        Some(predicate) => PlanNode::Filter(Filter {
            input: Box::new(input),
            predicate,
        }),
        None => input,
    }
}
