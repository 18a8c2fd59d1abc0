//! Whole-column type conversion.
//!
//! Conversion is atomic: either every cell of the column casts to the target
//! type and a new table is returned, or the first unconvertible cell aborts
//! the operation and nothing is committed.

use crate::error::{Result, RetortError};
use crate::infer;
use crate::schema::{Column, ColumnType, Table, Value};

/// Cast every cell of `column` to `target`, returning the converted table.
///
/// Nulls stay null. A float only converts to integer when it is whole; a
/// string converts to whatever it parses as.
pub fn convert_column(table: &Table, column: &str, target: ColumnType) -> Result<Table> {
    let index = table
        .column_index(column)
        .ok_or_else(|| RetortError::ColumnNotFound(column.to_string()))?;
    let source = &table.columns()[index];

    let mut converted = Vec::with_capacity(source.len());
    for (row, value) in source.values.iter().enumerate() {
        converted.push(convert_value(value, column, row, target)?);
    }

    let mut out = table.clone();
    out.columns_mut()[index] = Column::with_values(column, target, converted);
    Ok(out)
}

fn convert_value(value: &Value, column: &str, row: usize, target: ColumnType) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    let fail = || RetortError::Conversion {
        column: column.to_string(),
        row,
        value: value.render(),
        target,
    };

    match target {
        ColumnType::Integer => match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(Value::Int(*f as i64)),
            Value::Str(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(Value::Int(i));
                }
                match trimmed.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(Value::Int(f as i64)),
                    _ => Err(fail()),
                }
            }
            _ => Err(fail()),
        },
        ColumnType::Float => match value {
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| fail()),
            _ => Err(fail()),
        },
        ColumnType::String => Ok(Value::Str(value.render())),
        ColumnType::Timestamp => match value {
            Value::Timestamp(t) => Ok(Value::Timestamp(*t)),
            Value::Str(s) => infer::parse_timestamp(s).map(Value::Timestamp).ok_or_else(fail),
            _ => Err(fail()),
        },
    }
}
