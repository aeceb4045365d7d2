//! The in-memory tabular store.
//!
//! A [`Frame`] holds named, typed columns of equal length. The executor
//! treats it through a narrow surface: column existence, row count, per-row
//! read/write, rename, deletion, projection and the hash-join merge
//! primitive in [`join`].

mod join;

pub use join::hash_join;

use crate::error::{Error, Result};
use crate::types::{DataType, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single named column with a declared element type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub dtype: DataType,
    pub values: Vec<Value>,
}

impl Column {
    /// Builds a column from values, inferring the element type. An empty or
    /// all-null column defaults to nullable integer.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let dtype = infer_dtype(&values);
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }
}

/// Infers the narrowest element type covering all values.
fn infer_dtype(values: &[Value]) -> DataType {
    let mut dtype: Option<DataType> = None;
    let mut saw_null = false;
    for value in values {
        if value.is_null() {
            saw_null = true;
            continue;
        }
        dtype = Some(match dtype {
            None => value.data_type(),
            Some(current) => current
                .unify(&value.data_type())
                .unwrap_or_else(|| value.data_type()),
        });
    }
    let base = dtype.unwrap_or(DataType::I64);
    if saw_null {
        base.into_nullable()
    } else {
        base
    }
}

/// An in-memory table: ordered rows across named columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<Column>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frame from (name, values) pairs. All columns must have the
    /// same length and distinct names.
    pub fn from_columns<N, I>(columns: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<Value>)>,
    {
        let mut frame = Self::new();
        for (name, values) in columns {
            frame.push_column(Column::new(name, values))?;
        }
        Ok(frame)
    }

    /// Appends a column. Errors on duplicate names or row-count mismatch.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.index.contains_key(&column.name) {
            return Err(Error::InvalidValue(format!(
                "duplicate column {}",
                column.name
            )));
        }
        if !self.columns.is_empty() && column.values.len() != self.row_count() {
            return Err(Error::InvalidValue(format!(
                "column {} has {} rows, frame has {}",
                column.name,
                column.values.len(),
                self.row_count()
            )));
        }
        self.index.insert(column.name.clone(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The column names, in storage order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// The columns themselves, in storage order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.index
            .get(name)
            .map(|&i| &self.columns[i])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Reads one cell.
    pub fn value(&self, row: usize, column: &str) -> Result<&Value> {
        let column = self.column(column)?;
        column
            .values
            .get(row)
            .ok_or_else(|| Error::InvalidValue(format!("row {} out of bounds", row)))
    }

    /// Writes one cell, widening the column's declared type when the value
    /// does not fit it (e.g. a float into an integer column, or a null into
    /// a non-nullable one).
    pub fn set_value(&mut self, row: usize, column: &str, value: Value) -> Result<()> {
        let idx = *self
            .index
            .get(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        let col = &mut self.columns[idx];
        if row >= col.values.len() {
            return Err(Error::InvalidValue(format!("row {} out of bounds", row)));
        }
        if value.is_null() {
            col.dtype = col.dtype.clone().into_nullable();
        } else {
            col.dtype = col
                .dtype
                .unify(&value.data_type())
                .ok_or_else(|| Error::TypeMismatch {
                    expected: col.dtype.to_string(),
                    found: value.data_type().to_string(),
                })?;
        }
        col.values[row] = value;
        Ok(())
    }

    /// Renames a column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        if self.index.contains_key(to) {
            return Err(Error::InvalidValue(format!("duplicate column {}", to)));
        }
        let idx = self
            .index
            .remove(from)
            .ok_or_else(|| Error::ColumnNotFound(from.to_string()))?;
        self.columns[idx].name = to.to_string();
        self.index.insert(to.to_string(), idx);
        Ok(())
    }

    /// Drops a column.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let idx = self
            .index
            .remove(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        self.columns.remove(idx);
        for (i, column) in self.columns.iter().enumerate().skip(idx) {
            self.index.insert(column.name.clone(), i);
        }
        Ok(())
    }

    /// Copies the named columns into a new frame, in the given order.
    pub fn project(&self, names: &[String]) -> Result<Frame> {
        let mut frame = Frame::new();
        for name in names {
            frame.push_column(self.column(name)?.clone())?;
        }
        Ok(frame)
    }

    /// Rebuilds the name index, e.g. after deserialization.
    pub fn reindex(&mut self) {
        self.index = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
    }
}
