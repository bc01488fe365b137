//! Filter compilation
//!
//! Turns `Filter` trees into predicates over the joined relation, binding
//! every user value as a parameter.

use std::collections::HashSet;

use crate::criteria::{Context, Criteria, Filter, MultiOperator, RangeParameters};
use crate::definition::{EntityDefinition, Schema};
use crate::plan::{
    BinaryOperator, Expr, Filter as FilterNode, Literal, Params, PlanNode, Project, ProjectExpr,
};
use crate::resolver::resolve_field;
use crate::value::Value;
use super::error::PlanError;
use super::joins::{root_key, root_scan, JoinBuilder};

/// Compile a filter into a predicate, adding the joins it reads through
pub(crate) fn filter_expr(
    schema: &Schema,
    root: &EntityDefinition,
    filter: &Filter,
    joins: &mut JoinBuilder<'_>,
    params: &mut Params,
) -> Result<Expr, PlanError> {
    match filter {
        Filter::Equals { field, value } => {
            let expr = field_expr(schema, root, field, joins, params)?;
            if value.is_null() {
                Ok(Expr::IsNull(Box::new(expr)))
            } else {
                Ok(Expr::eq(expr, params.bind(value.clone())))
            }
        }
        Filter::EqualsAny { field, value } => {
            let expr = field_expr(schema, root, field, joins, params)?;
            let values = value.iter().map(|v| params.bind(v.clone())).collect();
            Ok(Expr::In {
                expr: Box::new(expr),
                values,
            })
        }
        Filter::Contains { field, value } => {
            let expr = field_expr(schema, root, field, joins, params)?;
            let pattern = params.bind(Value::Text(format!("%{}%", escape_like(value))));
            Ok(Expr::Like {
                expr: Box::new(expr),
                pattern: Box::new(pattern),
            })
        }
        Filter::Range { field, parameters } => {
            let expr = field_expr(schema, root, field, joins, params)?;
            Ok(range_expr(expr, parameters, params))
        }
        Filter::Not { operator, queries } => {
            if to_many_aliases(schema, root, filter)?.is_empty() {
                let inner = combine(schema, root, *operator, queries, joins, params)?;
                return Ok(Expr::Not(Box::new(inner)));
            }
            // Negate per root row: exclude every root that matches through any joined row
            let matching = root_subquery(root, joins.context(), params, |sub_joins, params| {
                combine(schema, root, *operator, queries, sub_joins, params).map(Some)
            })?;
            Ok(Expr::Not(Box::new(matching)))
        }
        Filter::Multi { operator, queries } => combine(schema, root, *operator, queries, joins, params),
    }
}

/// Aliases of the to-many joins a filter reads through
pub(crate) fn to_many_aliases(
    schema: &Schema,
    root: &EntityDefinition,
    filter: &Filter,
) -> Result<HashSet<String>, PlanError> {
    let mut aliases = HashSet::new();
    for path in filter.fields() {
        let resolved = resolve_field(schema, root, path)?;
        aliases.extend(resolved.to_many_aliases().into_iter().map(str::to_string));
    }
    Ok(aliases)
}

/// Root-level predicates of a criteria: the id restriction plus its filters
///
/// A filter applies inline when every to-many join it reads is one of
/// `inline_aliases` (joins the caller reads anyway). All other filters that
/// cross a to-many association are collected into a single
/// `root.pk IN (subquery)` so each root row is seen once.
pub(crate) fn criteria_predicates(
    schema: &Schema,
    root: &EntityDefinition,
    criteria: &Criteria,
    inline_aliases: &HashSet<String>,
    joins: &mut JoinBuilder<'_>,
    params: &mut Params,
) -> Result<Vec<Expr>, PlanError> {
    let mut predicates = Vec::new();

    if !criteria.ids.is_empty() {
        predicates.push(ids_predicate(root, &criteria.ids, params));
    }

    let mut deferred = Vec::new();
    for filter in &criteria.filters {
        let aliases = to_many_aliases(schema, root, filter)?;
        if aliases.is_subset(inline_aliases) {
            predicates.push(filter_expr(schema, root, filter, joins, params)?);
        } else {
            deferred.push(filter);
        }
    }

    if !deferred.is_empty() {
        let matching = root_subquery(root, joins.context(), params, |sub_joins, params| {
            let mut sub_predicates = Vec::with_capacity(deferred.len());
            for filter in deferred {
                sub_predicates.push(filter_expr(schema, root, filter, sub_joins, params)?);
            }
            Ok(Expr::conjunction(sub_predicates))
        })?;
        predicates.push(matching);
    }

    Ok(predicates)
}

/// `root.pk IN (SELECT root.pk ...)` over its own joins, filtered by `predicate`
fn root_subquery<'c, F>(
    root: &EntityDefinition,
    context: &'c Context,
    params: &mut Params,
    predicate: F,
) -> Result<Expr, PlanError>
where
    F: FnOnce(&mut JoinBuilder<'c>, &mut Params) -> Result<Option<Expr>, PlanError>,
{
    let mut sub_joins = JoinBuilder::new(context);
    let predicate = predicate(&mut sub_joins, params)?;
    let mut input = sub_joins.build(root_scan(root));
    if let Some(predicate) = predicate {
        input = PlanNode::Filter(FilterNode {
            input: Box::new(input),
            predicate,
        });
    }
    let subquery = PlanNode::Project(Project {
        input: Box::new(input),
        expressions: vec![ProjectExpr::new(root_key(root), "id")],
    });
    Ok(Expr::InSubquery {
        expr: Box::new(root_key(root)),
        subquery: Box::new(subquery),
    })
}

/// `root.pk IN (ids)`
pub(crate) fn ids_predicate(root: &EntityDefinition, ids: &[String], params: &mut Params) -> Expr {
    Expr::In {
        expr: Box::new(root_key(root)),
        values: ids.iter().map(|id| params.bind(Value::from(id.as_str()))).collect(),
    }
}

fn field_expr(
    schema: &Schema,
    root: &EntityDefinition,
    path: &str,
    joins: &mut JoinBuilder<'_>,
    params: &mut Params,
) -> Result<Expr, PlanError> {
    let resolved = resolve_field(schema, root, path)?;
    joins.add_path(&resolved, params);
    Ok(joins.field_expr(&resolved))
}

fn combine(
    schema: &Schema,
    root: &EntityDefinition,
    operator: MultiOperator,
    queries: &[Filter],
    joins: &mut JoinBuilder<'_>,
    params: &mut Params,
) -> Result<Expr, PlanError> {
    let exprs = queries
        .iter()
        .map(|query| filter_expr(schema, root, query, joins, params))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match operator {
        MultiOperator::And => Expr::And(exprs),
        MultiOperator::Or => Expr::Or(exprs),
    })
}

fn range_expr(expr: Expr, parameters: &RangeParameters, params: &mut Params) -> Expr {
    let bounds = [
        (&parameters.gt, BinaryOperator::Gt),
        (&parameters.gte, BinaryOperator::GtEq),
        (&parameters.lt, BinaryOperator::Lt),
        (&parameters.lte, BinaryOperator::LtEq),
    ];
    let comparisons: Vec<Expr> = bounds
        .into_iter()
        .filter_map(|(bound, op)| bound.as_ref().map(|value| (value, op)))
        .map(|(value, op)| Expr::binary(expr.clone(), op, params.bind(value.clone())))
        .collect();
    Expr::conjunction(comparisons).unwrap_or(Expr::Literal(Literal::Bool(true)))
}

/// Escape LIKE wildcards so the value matches literally (escape char `\`)
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
