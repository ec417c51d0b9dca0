// Partial update and filter specs
//
// A spec only holds the columns a caller actually supplied. A column that is
// absent here never reaches the generated SQL.

use chrono::NaiveDateTime;
use std::fmt;

/// A known column of one table
///
/// Implemented by closed enums so that generated SQL text only ever contains
/// identifiers from this list.
pub trait Column: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Table the column belongs to
    const TABLE: &'static str;

    /// SQL identifier of the column
    fn name(self) -> &'static str;
}

/// Typed value bound to a statement placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v.into())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// Ordered column -> value pairs, one entry per column
#[derive(Debug, Clone, PartialEq)]
struct ColumnValues<C> {
    entries: Vec<(C, SqlValue)>,
}

impl<C: Column> ColumnValues<C> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    // Re-setting a column replaces its value but keeps its position
    fn put(&mut self, column: C, value: SqlValue) {
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    fn get(&self, column: C) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }
}

/// Columns to change in a partial update, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdateSpec<C> {
    fields: ColumnValues<C>,
}

impl<C: Column> PartialUpdateSpec<C> {
    pub fn new() -> Self {
        Self {
            fields: ColumnValues::new(),
        }
    }

    pub fn set(mut self, column: C, value: impl Into<SqlValue>) -> Self {
        self.fields.put(column, value.into());
        self
    }

    /// Set `column` only when `value` is present
    pub fn set_opt<V: Into<SqlValue>>(self, column: C, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn get(&self, column: C) -> Option<&SqlValue> {
        self.fields.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.entries.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (C, &SqlValue)> {
        self.fields.entries.iter().map(|(c, v)| (*c, v))
    }
}

impl<C: Column> Default for PartialUpdateSpec<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Equality constraints joined with AND. Empty means "no restriction".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec<C> {
    fields: ColumnValues<C>,
}

impl<C: Column> FilterSpec<C> {
    pub fn new() -> Self {
        Self {
            fields: ColumnValues::new(),
        }
    }

    pub fn require(mut self, column: C, value: impl Into<SqlValue>) -> Self {
        self.fields.put(column, value.into());
        self
    }

    pub fn require_opt<V: Into<SqlValue>>(self, column: C, value: Option<V>) -> Self {
        match value {
            Some(v) => self.require(column, v),
            None => self,
        }
    }

    pub fn get(&self, column: C) -> Option<&SqlValue> {
        self.fields.get(column)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.entries.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (C, &SqlValue)> {
        self.fields.entries.iter().map(|(c, v)| (*c, v))
    }
}

impl<C: Column> Default for FilterSpec<C> {
    fn default() -> Self {
        Self::new()
    }
}
