//! SQL emitter
//!
//! Flattens a PlanNode tree into a single pretty-printed SELECT statement:
//! the scan becomes FROM, joins stack up below it, filters become WHERE,
//! the aggregate or projection becomes the select list, and sort/limit wrap
//! the result. Subqueries only appear inside `IN (...)` predicates.

use crate::plan::{
    Aggregate, AggregateExpr, AggregateFunction, Column, Expr, Literal, PlanNode,
    Project, QueryPlan, Scan, SortDirection,
};
use crate::value::Value;
use super::error::EmitError;

/// A SQL statement plus named parameter values (names without the leading colon)
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

/// Emit the SQL statement for a plan
pub fn emit_sql(plan: &QueryPlan) -> Result<SqlQuery, EmitError> {
    let sql = emit_node(&plan.root, 0)?;
    let params = plan
        .params
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    Ok(SqlQuery { sql, params })
}

/// Emit a SELECT statement for a plan node at the given indentation level
pub fn emit_node(node: &PlanNode, indent: usize) -> Result<String, EmitError> {
    let mut parts = SelectParts::default();
    collect(node, &mut parts, indent)?;
    parts.render(indent)
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SelectParts {
    projections: Option<Vec<String>>,
    from: Option<String>,
    joins: Vec<String>,
    predicates: Vec<String>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    limit: Option<usize>,
    offset: usize,
    paged: bool,
}

fn collect(node: &PlanNode, parts: &mut SelectParts, indent: usize) -> Result<(), EmitError> {
    match node {
        PlanNode::Scan(scan) => {
            if parts.from.is_some() {
                return Err(EmitError::InvalidPlan("multiple scans without a join".to_string()));
            }
            parts.from = Some(emit_table(scan));
        }
        PlanNode::Join(join) => {
            collect(&join.left, parts, indent)?;
            if parts.projections.is_some() {
                return Err(EmitError::InvalidPlan("join above a projection".to_string()));
            }
            parts.joins.push(format!(
                "LEFT JOIN {} ON {}",
                emit_table(&join.right),
                emit_expr(&join.condition, indent)?
            ));
        }
        PlanNode::Filter(filter) => {
            collect(&filter.input, parts, indent)?;
            if parts.projections.is_some() {
                return Err(EmitError::InvalidPlan("filter above a projection".to_string()));
            }
            parts.predicates.push(emit_expr(&filter.predicate, indent)?);
        }
        PlanNode::Aggregate(agg) => {
            collect(&agg.input, parts, indent)?;
            emit_aggregate(agg, parts, indent)?;
        }
        PlanNode::Project(proj) => {
            collect(&proj.input, parts, indent)?;
            emit_project(proj, parts, indent)?;
        }
        PlanNode::Sort(sort) => {
            collect(&sort.input, parts, indent)?;
            if !parts.order_by.is_empty() {
                return Err(EmitError::InvalidPlan("nested sort".to_string()));
            }
            for key in &sort.sort_keys {
                let dir = match key.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                parts.order_by.push(format!("{} {}", emit_expr(&key.expr, indent)?, dir));
            }
        }
        PlanNode::Limit(limit) => {
            collect(&limit.input, parts, indent)?;
            if parts.paged {
                return Err(EmitError::InvalidPlan("nested limit".to_string()));
            }
            parts.paged = true;
            parts.limit = limit.limit;
            parts.offset = limit.offset;
        }
    }
    Ok(())
}

fn emit_aggregate(agg: &Aggregate, parts: &mut SelectParts, indent: usize) -> Result<(), EmitError> {
    if parts.projections.is_some() {
        return Err(EmitError::InvalidPlan("nested projection".to_string()));
    }

    let mut select_items = Vec::with_capacity(agg.group_by.len() + agg.aggregates.len());
    for group in &agg.group_by {
        let expr = emit_expr(&group.expr, indent)?;
        select_items.push(format!("{} AS {}", expr, quote_ident(&group.alias)));
        parts.group_by.push(expr);
    }
    for aggregate in &agg.aggregates {
        select_items.push(emit_aggregate_expr(aggregate, indent)?);
    }

    if select_items.is_empty() {
        return Err(EmitError::InvalidPlan("aggregate without outputs".to_string()));
    }
    parts.projections = Some(select_items);
    Ok(())
}

fn emit_project(proj: &Project, parts: &mut SelectParts, indent: usize) -> Result<(), EmitError> {
    if parts.projections.is_some() {
        return Err(EmitError::InvalidPlan("nested projection".to_string()));
    }

    let items: Vec<String> = proj
        .expressions
        .iter()
        .map(|pe| Ok(format!("{} AS {}", emit_expr(&pe.expr, indent)?, quote_ident(&pe.alias))))
        .collect::<Result<Vec<_>, EmitError>>()?;

    parts.projections = Some(items);
    Ok(())
}

impl SelectParts {
    fn render(self, indent: usize) -> Result<String, EmitError> {
        let p = pad(indent);
        let from = self.from.ok_or(EmitError::MissingFrom)?;
        let select = match self.projections {
            Some(items) => items.join(", "),
            None => "*".to_string(),
        };

        let mut lines = vec![format!("{p}SELECT {select}"), format!("{p}FROM {from}")];
        for join in self.joins {
            lines.push(format!("{p}{join}"));
        }
        if !self.predicates.is_empty() {
            lines.push(format!("{p}WHERE {}", self.predicates.join(" AND ")));
        }
        if !self.group_by.is_empty() {
            lines.push(format!("{p}GROUP BY {}", self.group_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            lines.push(format!("{p}ORDER BY {}", self.order_by.join(", ")));
        }
        match (self.limit, self.offset) {
            (Some(limit), 0) => lines.push(format!("{p}LIMIT {limit}")),
            (Some(limit), offset) => lines.push(format!("{p}LIMIT {limit} OFFSET {offset}")),
            // SQLite needs a LIMIT clause to accept OFFSET
            (None, offset) if offset > 0 => lines.push(format!("{p}LIMIT -1 OFFSET {offset}")),
            (None, _) => {}
        }

        Ok(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

fn emit_expr(expr: &Expr, indent: usize) -> Result<String, EmitError> {
    match expr {
        Expr::Column(col) => Ok(emit_column(col)),
        Expr::Literal(lit) => Ok(emit_literal(lit)),
        Expr::Param(name) => Ok(format!(":{}", name)),
        Expr::JsonExtract { column, path } => Ok(format!(
            "json_extract({}, '$.{}')",
            emit_column(column),
            path.replace('\'', "''")
        )),
        Expr::BinaryOp { left, op, right } => {
            let l = emit_expr(left, indent)?;
            let r = emit_expr(right, indent)?;
            Ok(format!("{} {} {}", l, op.as_str(), r))
        }
        Expr::And(exprs) => {
            if exprs.is_empty() {
                return Ok("TRUE".to_string());
            }
            let parts = exprs.iter().map(|e| emit_expr(e, indent)).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" AND ")))
        }
        Expr::Or(exprs) => {
            if exprs.is_empty() {
                return Ok("FALSE".to_string());
            }
            let parts = exprs.iter().map(|e| emit_expr(e, indent)).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", parts.join(" OR ")))
        }
        Expr::Not(inner) => Ok(format!("NOT ({})", emit_expr(inner, indent)?)),
        Expr::In { expr, values } => {
            if values.is_empty() {
                return Ok("FALSE".to_string());
            }
            let needle = emit_expr(expr, indent)?;
            let vals = values.iter().map(|v| emit_expr(v, indent)).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{} IN ({})", needle, vals.join(", ")))
        }
        Expr::InSubquery { expr, subquery } => {
            let needle = emit_expr(expr, indent)?;
            let inner = emit_node(subquery, indent + 1)?;
            Ok(format!("{} IN (\n{}\n{})", needle, inner, pad(indent)))
        }
        Expr::Like { expr, pattern } => Ok(format!(
            "{} LIKE {} ESCAPE '\\'",
            emit_expr(expr, indent)?,
            emit_expr(pattern, indent)?
        )),
        Expr::IsNull(inner) => Ok(format!("{} IS NULL", emit_expr(inner, indent)?)),
        Expr::Coalesce(exprs) => {
            let parts = exprs.iter().map(|e| emit_expr(e, indent)).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("COALESCE({})", parts.join(", ")))
        }
    }
}

fn emit_aggregate_expr(agg: &AggregateExpr, indent: usize) -> Result<String, EmitError> {
    let func_sql = match agg.func {
        AggregateFunction::CountAll => "COUNT(*)".to_string(),
        AggregateFunction::Sum => format!("SUM({})", emit_expr(&agg.expr, indent)?),
        AggregateFunction::Avg => format!("AVG({})", emit_expr(&agg.expr, indent)?),
        AggregateFunction::Count => format!("COUNT({})", emit_expr(&agg.expr, indent)?),
        AggregateFunction::CountDistinct => format!("COUNT(DISTINCT {})", emit_expr(&agg.expr, indent)?),
        AggregateFunction::Min => format!("MIN({})", emit_expr(&agg.expr, indent)?),
        AggregateFunction::Max => format!("MAX({})", emit_expr(&agg.expr, indent)?),
    };
    Ok(format!("{} AS {}", func_sql, quote_ident(&agg.alias)))
}

fn emit_table(scan: &Scan) -> String {
    let alias = scan.reference_name();
    if alias != scan.table {
        format!("{} AS {}", quote_ident(&scan.table), quote_ident(alias))
    } else {
        quote_ident(&scan.table)
    }
}

fn emit_column(col: &Column) -> String {
    if col.table.is_empty() {
        quote_ident(&col.name)
    } else {
        format!("{}.{}", quote_ident(&col.table), quote_ident(&col.name))
    }
}

fn emit_literal(lit: &Literal) -> String {
    match lit {
        Literal::Null => "NULL".to_string(),
        Literal::Bool(b) => if *b { "TRUE".to_string() } else { "FALSE".to_string() },
    }
}

/// Double-quote an identifier; aliases like `product.categories` contain dots
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
