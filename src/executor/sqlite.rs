//! SQLite store

use std::path::Path;

use log::{debug, trace};
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

use crate::emitter::SqlQuery;
use crate::value::Value;
use super::error::ExecuteError;
use super::rows::RowSet;
use super::Connection;

/// A `Connection` backed by a rusqlite database
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    pub fn open_in_memory() -> Result<Self, ExecuteError> {
        Ok(Self {
            conn: rusqlite::Connection::open_in_memory()?,
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExecuteError> {
        Ok(Self {
            conn: rusqlite::Connection::open(path)?,
        })
    }

    /// Run a batch of statements (schema setup, fixtures)
    pub fn execute_batch(&self, sql: &str) -> Result<(), ExecuteError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }
}

impl From<rusqlite::Connection> for SqliteConnection {
    fn from(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }
}

impl Connection for SqliteConnection {
    fn fetch(&self, query: &SqlQuery) -> Result<RowSet, ExecuteError> {
        debug!("executing query with {} params:\n{}", query.params.len(), query.sql);

        let mut stmt = self.conn.prepare(&query.sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();

        // Parameters the statement never references are skipped
        for (name, value) in &query.params {
            if let Some(idx) = stmt.parameter_index(&format!(":{}", name))? {
                trace!("bind :{} = {:?}", name, value);
                stmt.raw_bind_parameter(idx, value)?;
            }
        }

        let mut set = RowSet::new(columns);
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                values.push(from_sql_ref(row.get_ref(idx)?));
            }
            set.rows.push(values);
        }

        debug!("fetched {} rows", set.len());
        Ok(set)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Float(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn from_sql_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
