//! Plan node types

use super::expr::{AggregateExpr, Expr};
use crate::value::Value;

/// A node in the logical plan tree
#[derive(Debug, Clone)]
pub enum PlanNode {
    /// Scan a table
    Scan(Scan),
    /// Join a table onto a relation
    Join(Join),
    /// Filter rows
    Filter(Filter),
    /// Aggregate (GROUP BY)
    Aggregate(Aggregate),
    /// Project columns
    Project(Project),
    /// Sort rows (ORDER BY)
    Sort(Sort),
    /// Limit/offset (paging)
    Limit(Limit),
}

/// Scan a table
#[derive(Debug, Clone)]
pub struct Scan {
    /// Physical table name
    pub table: String,
    /// Alias for the table
    pub alias: Option<String>,
}

impl Scan {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Get the name to use for column references (alias if set, otherwise table)
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

/// Left join a table onto a relation
#[derive(Debug, Clone)]
pub struct Join {
    /// Left input
    pub left: Box<PlanNode>,
    /// Joined table
    pub right: Scan,
    /// ON condition
    pub condition: Expr,
}

/// Filter rows (WHERE clause)
#[derive(Debug, Clone)]
pub struct Filter {
    /// Input relation
    pub input: Box<PlanNode>,
    /// Filter predicate
    pub predicate: Expr,
}

/// Aggregate (GROUP BY)
#[derive(Debug, Clone)]
pub struct Aggregate {
    /// Input relation
    pub input: Box<PlanNode>,
    /// GROUP BY expressions with their output aliases
    pub group_by: Vec<ProjectExpr>,
    /// Aggregate expressions
    pub aggregates: Vec<AggregateExpr>,
}

/// Project specific columns or computed expressions
#[derive(Debug, Clone)]
pub struct Project {
    /// Input relation
    pub input: Box<PlanNode>,
    /// Expressions to project with their aliases
    pub expressions: Vec<ProjectExpr>,
}

/// A projected expression with its output alias
#[derive(Debug, Clone)]
pub struct ProjectExpr {
    /// The expression to compute
    pub expr: Expr,
    /// Output column name
    pub alias: String,
}

impl ProjectExpr {
    pub fn new(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

/// Sort rows (ORDER BY)
#[derive(Debug, Clone)]
pub struct Sort {
    /// Input relation
    pub input: Box<PlanNode>,
    /// Sort keys with direction
    pub sort_keys: Vec<SortKey>,
}

/// A sort key with direction
#[derive(Debug, Clone)]
pub struct SortKey {
    pub expr: Expr,
    pub direction: SortDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Return at most `limit` rows after skipping `offset`
#[derive(Debug, Clone)]
pub struct Limit {
    pub input: Box<PlanNode>,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Named parameters referenced by `Expr::Param`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Vec<(String, Value)>,
    next: usize,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under a fresh name and return the parameter expression
    pub fn bind(&mut self, value: Value) -> Expr {
        let name = format!("p{}", self.next);
        self.next += 1;
        self.values.push((name.clone(), value));
        Expr::Param(name)
    }

    /// Bind a value under a fixed name; rebinding replaces the value
    pub fn bind_named(&mut self, name: &str, value: Value) -> Expr {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
        Expr::Param(name.to_string())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A plan ready for emission: the tree plus the values of its parameters
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub root: PlanNode,
    pub params: Params,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_bind_fresh_names() {
        let mut params = Params::new();
        let first = params.bind(Value::from("a"));
        let second = params.bind(Value::from(10));
        assert!(matches!(first, Expr::Param(ref n) if n == "p0"));
        assert!(matches!(second, Expr::Param(ref n) if n == "p1"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_bind_named_is_idempotent() {
        let mut params = Params::new();
        params.bind_named("languageUuid", Value::from("en"));
        params.bind_named("languageUuid", Value::from("de"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("languageUuid"), Some(&Value::from("de")));
    }
}
