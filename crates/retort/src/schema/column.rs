//! A named, typed column of cells.

use super::types::{ColumnType, Value};

/// One column of the table: a name, a declared type, and its cells.
///
/// Cells are either `Value::Null` or a value matching the declared type;
/// decoding and every transformation maintain that agreement.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Declared type, set once by inference or coercion.
    pub dtype: ColumnType,
    /// Cell values, one per table row.
    pub values: Vec<Value>,
}

impl Column {
    /// Create an empty column.
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
            values: Vec::new(),
        }
    }

    /// Create a column from existing cells.
    pub fn with_values(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Get a cell by row index.
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Non-null cells as `f64`, in row order. Empty for non-numeric columns.
    pub fn non_null_f64s(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.as_f64()).collect()
    }
}
