//! Fetched rows

use crate::value::Value;
use super::error::ExecuteError;

/// Rows returned by a query, with their column names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// One row, addressable by column name
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Value of a column, `None` if the query did not select it
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of a column the query must have selected
    pub fn require(&self, column: &str) -> Result<&'a Value, ExecuteError> {
        self.get(column)
            .ok_or_else(|| ExecuteError::MissingColumn(column.to_string()))
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_lookup_by_name() {
        let mut set = RowSet::new(vec!["g0".to_string(), "min".to_string()]);
        set.rows.push(vec![Value::from("cat1"), Value::from(10.0)]);

        let row = set.iter().next().unwrap();
        assert_eq!(row.get("min"), Some(&Value::Float(10.0)));
        assert_eq!(row.get("max"), None);
        assert!(matches!(row.require("max"), Err(ExecuteError::MissingColumn(c)) if c == "max"));
        assert_eq!(set.column_index("g0"), Some(0));
    }
}
