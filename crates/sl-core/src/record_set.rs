//! Ordered, named-column record sets
//!
//! A [`RecordSet`] is the unit of exchange between ingestion, validation and
//! loading. Columns are addressed by name; row order is the order rows were
//! read from the source.

use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use std::collections::HashSet;

static NULL: Value = Value::Null;

/// Tabular collection of rows sharing one column set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Create an empty record set with the given header
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> CoreResult<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(CoreError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a record set from a header and rows, checking every row's width
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> CoreResult<Self> {
        let mut rs = Self::new(columns)?;
        rs.rows.reserve(rows.len());
        for row in rows {
            rs.push_row(row)?;
        }
        Ok(rs)
    }

    /// Append one row
    pub fn push_row(&mut self, row: Vec<Value>) -> CoreResult<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowWidthMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if the header contains `name`
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (`row`, `column`); `None` if the column does not exist or the
    /// row is out of range
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Cell at (`row`, `column`), treating an absent column as null
    pub fn value(&self, row: usize, column: &str) -> &Value {
        self.get(row, column).unwrap_or(&NULL)
    }

    /// Overwrite one cell. Returns false if the column or row does not exist.
    pub fn set(&mut self, row: usize, column: &str, value: Value) -> bool {
        let Some(idx) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row) {
            Some(r) => {
                r[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Iterate a column's cells in row order; absent columns yield nulls
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let idx = self.column_index(column);
        self.rows.iter().map(move |r| match idx {
            Some(i) => &r[i],
            None => &NULL,
        })
    }

    /// Replace a column's values, or append the column if it does not exist
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> CoreResult<()> {
        if values.len() != self.rows.len() {
            return Err(CoreError::ColumnLengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Set every row's `name` cell to the same value, adding the column if needed
    pub fn fill_column(&mut self, name: &str, value: Value) {
        let values = vec![value; self.rows.len()];
        // Length always matches, so this cannot fail.
        let _ = self.set_column(name, values);
    }

    /// Iterate rows as name-addressable views
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// View of a single row
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Cell for `column`, or null if the column does not exist
    pub fn get(&self, column: &str) -> &'a Value {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
            .unwrap_or(&NULL)
    }

    /// Cells in header order
    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

#[cfg(test)]
#[path = "record_set_test.rs"]
mod tests;
