//! XLSX decode/encode for the first worksheet.
//!
//! XLSX stores every number as a double, so a float column of whole values
//! re-decodes as an integer column; delimited text is the lossless carrier.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

use crate::error::{Result, RetortError};
use crate::schema::{Table, Value};

/// Hard sheet limits of the XLSX format.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Decode XLSX bytes into a table from the first worksheet.
pub fn decode(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| RetortError::Format(format!("not a valid workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RetortError::Format("workbook has no worksheets".to_string()))?
        .map_err(|e| RetortError::Format(format!("cannot read worksheet: {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| RetortError::Format("worksheet is empty".to_string()))?
        .iter()
        .map(cell_to_string)
        .collect();

    let grid: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    if grid.is_empty() {
        return Err(RetortError::Format("no data rows found".to_string()));
    }

    super::table_from_grid(headers, grid)
}

/// Encode a table as an XLSX workbook with one worksheet.
pub fn encode(table: &Table) -> Result<Vec<u8>> {
    if table.column_count() > MAX_COLUMNS {
        return Err(RetortError::Format(format!(
            "table has {} columns, XLSX allows {MAX_COLUMNS}",
            table.column_count()
        )));
    }
    if table.row_count() + 1 > MAX_ROWS {
        return Err(RetortError::Format(format!(
            "table has {} rows, XLSX allows {}",
            table.row_count(),
            MAX_ROWS - 1
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.column_names().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *name)
            .map_err(|e| RetortError::Format(e.to_string()))?;
    }

    for (col, column) in table.columns().iter().enumerate() {
        for (row, value) in column.values.iter().enumerate() {
            let (row, col) = (row as u32 + 1, col as u16);
            match value {
                Value::Null => {}
                Value::Int(i) => {
                    worksheet
                        .write_number(row, col, *i as f64)
                        .map_err(|e| RetortError::Format(e.to_string()))?;
                }
                Value::Float(f) => {
                    worksheet
                        .write_number(row, col, *f)
                        .map_err(|e| RetortError::Format(e.to_string()))?;
                }
                other => {
                    worksheet
                        .write_string(row, col, other.render())
                        .map_err(|e| RetortError::Format(e.to_string()))?;
                }
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| RetortError::Format(e.to_string()))
}

/// Lower a worksheet cell to the raw string form the inference pass reads.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole doubles are written back as integer literals so a
            // spreadsheet column of counts infers as integer.
            if f.fract() == 0.0 && f.is_finite() {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Value::Timestamp(d).render())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}
