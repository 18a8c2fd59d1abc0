//! Table-level data model.

use crate::error::{Result, RetortError};

use super::column::Column;
use super::types::ColumnType;

/// Separator used when hashing a row into a comparison key. Never appears
/// in rendered cell values that originate from delimited or spreadsheet
/// input, so joined keys cannot collide across column boundaries.
const ROW_KEY_SEPARATOR: char = '\u{1f}';

/// The in-memory dataset: ordered, uniquely named, typed columns with
/// aligned rows.
///
/// Tables are value types. Transformations consume a table by reference and
/// produce a new table; a failed operation leaves the input untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Create a table from columns, validating the table invariants.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Table::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Append a column. Fails if the name is taken or the length disagrees
    /// with the existing columns.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if self.column_index(&column.name).is_some() {
            return Err(RetortError::Schema(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(RetortError::Schema(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.len(),
                    first.len()
                )));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Insert a column, replacing any existing column of the same name in
    /// place (assignment semantics for derived columns).
    pub fn replace_or_push_column(&mut self, column: Column) -> Result<()> {
        match self.column_index(&column.name) {
            Some(index) => {
                if column.len() != self.row_count() {
                    return Err(RetortError::Schema(format!(
                        "column '{}' has {} rows, expected {}",
                        column.name,
                        column.len(),
                        self.row_count()
                    )));
                }
                self.columns[index] = column;
                Ok(())
            }
            None => self.push_column(column),
        }
    }

    /// Number of rows shared by every column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// All column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| RetortError::ColumnNotFound(name.to_string()))
    }

    /// Names of columns declared integer or float.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of columns declared string.
    pub fn text_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.dtype.is_text())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Comparison key for a row: rendered cells joined with a separator
    /// that cannot occur inside them.
    pub(crate) fn row_key(&self, row: usize) -> String {
        let mut key = String::new();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                key.push(ROW_KEY_SEPARATOR);
            }
            if let Some(value) = column.get(row) {
                key.push_str(&value.render());
            }
        }
        key
    }

    /// New table keeping the rows where `keep` is true.
    pub(crate) fn filter_rows(&self, keep: &[bool]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let values = column
                    .values
                    .iter()
                    .zip(keep)
                    .filter(|&(_, &k)| k)
                    .map(|(v, _)| v.clone())
                    .collect();
                Column::with_values(column.name.clone(), column.dtype, values)
            })
            .collect();
        Table { columns }
    }

    /// New table with rows rearranged into `order`.
    pub(crate) fn take_rows(&self, order: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let values = order.iter().map(|&i| column.values[i].clone()).collect();
                Column::with_values(column.name.clone(), column.dtype, values)
            })
            .collect();
        Table { columns }
    }
}
