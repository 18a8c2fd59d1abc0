//! Engine that applies transformation operations to tables.

use std::collections::HashSet;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::coerce;
use crate::error::{Result, RetortError};
use crate::schema::{Column, ColumnType, Table, Value};
use crate::stats;

use super::operations::{
    ArithmeticOp, FilterOp, TextKind, TransformChange, TransformOperation,
};

/// Everything that is not a word character or whitespace.
static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Result of applying one operation: the new table and its change record.
#[derive(Debug, Clone)]
pub struct Applied {
    pub table: Table,
    pub change: TransformChange,
}

/// Applies operations to a table, producing a new table per operation.
pub struct TransformEngine;

impl TransformEngine {
    /// Create a new transform engine.
    pub fn new() -> Self {
        Self
    }

    /// Apply one operation. The input table is never mutated; on error it
    /// is the caller's current table, unchanged.
    pub fn apply(&self, operation: &TransformOperation, table: &Table) -> Result<Applied> {
        let rows_before = table.row_count();
        let before: HashSet<String> = table.column_names().iter().map(|s| s.to_string()).collect();

        let result = match operation {
            TransformOperation::DropNulls => Ok(drop_nulls(table)),
            TransformOperation::NormalizeNumeric => normalize_numeric(table),
            TransformOperation::ReplaceZero { replacement } => {
                Ok(replace_zero(table, *replacement))
            }
            TransformOperation::DropDuplicates => Ok(drop_duplicates(table)),
            TransformOperation::FilterRows { column, op, value } => {
                filter_rows(table, column, *op, *value)
            }
            TransformOperation::RemoveOutliers { column, threshold } => {
                remove_outliers(table, column, *threshold)
            }
            TransformOperation::SplitColumn { column, delimiter } => {
                split_column(table, column, delimiter)
            }
            TransformOperation::CombineColumns { columns, separator } => {
                combine_columns(table, columns, separator)
            }
            TransformOperation::CalculatedColumn {
                left,
                op,
                right,
                name,
            } => calculated_column(table, left, *op, right, name),
            TransformOperation::SortRows { column, ascending } => {
                sort_rows(table, column, *ascending)
            }
            TransformOperation::TextTransform { column, kind } => {
                text_transform(table, column, *kind)
            }
            TransformOperation::ConvertType { column, target } => {
                coerce::convert_column(table, column, *target)
            }
        }?;

        let columns_added = result
            .column_names()
            .iter()
            .filter(|name| !before.contains(**name))
            .map(|name| name.to_string())
            .collect();

        Ok(Applied {
            change: TransformChange {
                description: operation.description(),
                rows_before,
                rows_after: result.row_count(),
                columns_added,
            },
            table: result,
        })
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn drop_nulls(table: &Table) -> Table {
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| {
            table
                .columns()
                .iter()
                .all(|column| !column.values[row].is_null())
        })
        .collect();
    table.filter_rows(&keep)
}

fn normalize_numeric(table: &Table) -> Result<Table> {
    let mut out = table.clone();
    for index in 0..out.column_count() {
        if !out.columns()[index].dtype.is_numeric() {
            continue;
        }

        let column = &out.columns()[index];
        let values = column.non_null_f64s();
        if values.is_empty() {
            continue;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            return Err(RetortError::Arithmetic(format!(
                "cannot normalize constant column '{}' (min == max == {min})",
                column.name
            )));
        }

        let span = max - min;
        let name = column.name.clone();
        let rescaled = column
            .values
            .iter()
            .map(|value| match value.as_f64() {
                Some(v) => Value::Float((v - min) / span),
                None => Value::Null,
            })
            .collect();
        out.columns_mut()[index] = Column::with_values(name, ColumnType::Float, rescaled);
    }
    Ok(out)
}

fn replace_zero(table: &Table, replacement: f64) -> Table {
    let whole = replacement.fract() == 0.0 && replacement.is_finite();
    let mut out = table.clone();
    for index in 0..out.column_count() {
        let column = &out.columns()[index];
        let replaced = match column.dtype {
            // A fractional replacement cannot live in an integer column, so
            // the whole column is promoted to float (upcast on replace).
            ColumnType::Integer if !whole => {
                let values = column
                    .values
                    .iter()
                    .map(|value| match value {
                        Value::Int(0) => Value::Float(replacement),
                        Value::Int(i) => Value::Float(*i as f64),
                        _ => Value::Null,
                    })
                    .collect();
                Column::with_values(column.name.clone(), ColumnType::Float, values)
            }
            ColumnType::Integer => {
                let values = column
                    .values
                    .iter()
                    .map(|value| match value {
                        Value::Int(0) => Value::Int(replacement as i64),
                        other => other.clone(),
                    })
                    .collect();
                Column::with_values(column.name.clone(), ColumnType::Integer, values)
            }
            ColumnType::Float => {
                let values = column
                    .values
                    .iter()
                    .map(|value| match value {
                        Value::Float(f) if *f == 0.0 => Value::Float(replacement),
                        other => other.clone(),
                    })
                    .collect();
                Column::with_values(column.name.clone(), ColumnType::Float, values)
            }
            _ => continue,
        };
        out.columns_mut()[index] = replaced;
    }
    out
}

fn drop_duplicates(table: &Table) -> Table {
    let mut seen = IndexSet::new();
    let keep: Vec<bool> = (0..table.row_count())
        .map(|row| seen.insert(table.row_key(row)))
        .collect();
    table.filter_rows(&keep)
}

fn filter_rows(table: &Table, column: &str, op: FilterOp, value: f64) -> Result<Table> {
    let target = table.column(column)?;
    if !target.dtype.is_numeric() {
        return Err(RetortError::Schema(format!(
            "filter requires a numeric column, '{}' is {}",
            column, target.dtype
        )));
    }

    // A null cell compares as false, so its row is dropped.
    let keep: Vec<bool> = target
        .values
        .iter()
        .map(|cell| {
            cell.as_f64().is_some_and(|v| match op {
                FilterOp::GreaterThan => v > value,
                FilterOp::LessThan => v < value,
                FilterOp::EqualTo => v == value,
            })
        })
        .collect();
    Ok(table.filter_rows(&keep))
}

fn remove_outliers(table: &Table, column: &str, threshold: f64) -> Result<Table> {
    let target = table.column(column)?;
    if !target.dtype.is_numeric() {
        return Err(RetortError::Schema(format!(
            "outlier removal requires a numeric column, '{}' is {}",
            column, target.dtype
        )));
    }

    let mut values = target.non_null_f64s();
    if values.is_empty() {
        return Err(RetortError::EmptyColumn(column.to_string()));
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = stats::quantile(&values, 0.25);
    let q3 = stats::quantile(&values, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - threshold * iqr;
    let upper = q3 + threshold * iqr;

    // Rows with a null cell pass the (negated) range test and are kept.
    let keep: Vec<bool> = target
        .values
        .iter()
        .map(|cell| cell.as_f64().is_none_or(|v| v >= lower && v <= upper))
        .collect();
    Ok(table.filter_rows(&keep))
}

fn split_column(table: &Table, column: &str, delimiter: &str) -> Result<Table> {
    if delimiter.is_empty() {
        return Err(RetortError::Schema(
            "split delimiter must not be empty".to_string(),
        ));
    }
    let source = table.column(column)?;

    let parts_per_row: Vec<Option<Vec<String>>> = source
        .values
        .iter()
        .map(|cell| {
            if cell.is_null() {
                None
            } else {
                Some(
                    cell.render()
                        .split(delimiter)
                        .map(str::to_string)
                        .collect(),
                )
            }
        })
        .collect();

    let max_parts = parts_per_row
        .iter()
        .flatten()
        .map(Vec::len)
        .max()
        .unwrap_or(0);

    let mut out = table.clone();
    for part in 0..max_parts {
        let name = format!("{}_part_{}", column, part + 1);
        let values = parts_per_row
            .iter()
            .map(|parts| match parts {
                Some(parts) => parts
                    .get(part)
                    .map(|s| Value::Str(s.clone()))
                    .unwrap_or(Value::Null),
                None => Value::Null,
            })
            .collect();
        out.replace_or_push_column(Column::with_values(name, ColumnType::String, values))?;
    }
    Ok(out)
}

fn combine_columns(table: &Table, columns: &[String], separator: &str) -> Result<Table> {
    if columns.is_empty() {
        return Err(RetortError::Schema(
            "combine requires at least one column".to_string(),
        ));
    }
    let selected: Vec<&Column> = columns
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<_>>()?;

    let values = (0..table.row_count())
        .map(|row| {
            let joined = selected
                .iter()
                .map(|column| column.values[row].render())
                .collect::<Vec<_>>()
                .join(separator);
            Value::Str(joined)
        })
        .collect();

    let mut out = table.clone();
    out.replace_or_push_column(Column::with_values(
        "combined_column",
        ColumnType::String,
        values,
    ))?;
    Ok(out)
}

fn calculated_column(
    table: &Table,
    left: &str,
    op: ArithmeticOp,
    right: &str,
    name: &str,
) -> Result<Table> {
    let lhs = table.column(left)?;
    let rhs = table.column(right)?;
    if !lhs.dtype.is_numeric() || !rhs.dtype.is_numeric() {
        return Err(RetortError::Arithmetic(format!(
            "'{left}' {} '{right}' requires numeric operands",
            op.symbol()
        )));
    }

    // Integer division is true division in this catalog, so it always
    // produces a float column.
    let integral = lhs.dtype == ColumnType::Integer
        && rhs.dtype == ColumnType::Integer
        && op != ArithmeticOp::Divide;

    let mut values = Vec::with_capacity(table.row_count());
    for (row, (a, b)) in lhs.values.iter().zip(&rhs.values).enumerate() {
        if a.is_null() || b.is_null() {
            values.push(Value::Null);
            continue;
        }
        if integral {
            let (Value::Int(x), Value::Int(y)) = (a, b) else {
                return Err(RetortError::Arithmetic(format!(
                    "non-integer cell in integer column at row {row}"
                )));
            };
            let computed = match op {
                ArithmeticOp::Add => x.checked_add(*y),
                ArithmeticOp::Subtract => x.checked_sub(*y),
                ArithmeticOp::Multiply => x.checked_mul(*y),
                ArithmeticOp::Divide => None,
            };
            match computed {
                Some(v) => values.push(Value::Int(v)),
                None => {
                    return Err(RetortError::Arithmetic(format!(
                        "integer overflow at row {row} ('{left}' {} '{right}')",
                        op.symbol()
                    )));
                }
            }
        } else {
            let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                return Err(RetortError::Arithmetic(format!(
                    "non-numeric cell at row {row}"
                )));
            };
            let computed = match op {
                ArithmeticOp::Add => x + y,
                ArithmeticOp::Subtract => x - y,
                ArithmeticOp::Multiply => x * y,
                ArithmeticOp::Divide => {
                    if y == 0.0 {
                        return Err(RetortError::Arithmetic(format!(
                            "division by zero at row {row} ('{left}' / '{right}')"
                        )));
                    }
                    x / y
                }
            };
            values.push(Value::Float(computed));
        }
    }

    let dtype = if integral {
        ColumnType::Integer
    } else {
        ColumnType::Float
    };
    let mut out = table.clone();
    out.replace_or_push_column(Column::with_values(name, dtype, values))?;
    Ok(out)
}

fn sort_rows(table: &Table, column: &str, ascending: bool) -> Result<Table> {
    let target = table.column(column)?;

    let mut order: Vec<usize> = (0..table.row_count()).collect();
    // Stable sort keeps ties in input order; nulls go last regardless of
    // direction, so the reversal only applies between non-null cells.
    order.sort_by(|&i, &j| {
        let (a, b) = (&target.values[i], &target.values[j]);
        match (a.is_null(), b.is_null()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => {
                let ordering = a.compare(b);
                if ascending { ordering } else { ordering.reverse() }
            }
        }
    });
    Ok(table.take_rows(&order))
}

fn text_transform(table: &Table, column: &str, kind: TextKind) -> Result<Table> {
    let index = table
        .column_index(column)
        .ok_or_else(|| RetortError::ColumnNotFound(column.to_string()))?;
    let source = &table.columns()[index];
    if source.dtype != ColumnType::String {
        return Err(RetortError::Schema(format!(
            "text transform requires a string column, '{}' is {}",
            column, source.dtype
        )));
    }

    let values = source
        .values
        .iter()
        .map(|cell| match cell {
            Value::Str(s) => Value::Str(match kind {
                TextKind::Lowercase => s.to_lowercase(),
                TextKind::Trim => s.trim().to_string(),
                TextKind::StripSpecialChars => SPECIAL_CHARS.replace_all(s, "").into_owned(),
            }),
            other => other.clone(),
        })
        .collect();

    let mut out = table.clone();
    out.columns_mut()[index] =
        Column::with_values(column, ColumnType::String, values);
    Ok(out)
}
