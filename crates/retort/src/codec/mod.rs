//! Encoding and decoding tables to and from byte streams.
//!
//! Two formats are supported: the delimited-text family (CSV, TSV,
//! semicolon, pipe) and XLSX spreadsheets. Both decoders lower the input
//! into a raw string grid, then a strict inference pass declares each
//! column's type and parses the cells into typed values.

pub mod delimited;
pub mod excel;

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, RetortError};
use crate::infer;
use crate::schema::{Column, Table};

/// Supported byte-stream formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// CSV and its delimiter variants.
    Delimited,
    /// XLSX workbook, first worksheet.
    Spreadsheet,
}

impl Format {
    /// Determine the format from a file name's extension.
    pub fn from_name(name: &str) -> Result<Format> {
        let extension = name
            .rsplit('.')
            .next()
            .filter(|ext| !ext.is_empty() && *ext != name)
            .map(str::to_lowercase)
            .ok_or_else(|| {
                RetortError::Format(format!("'{name}' has no file extension"))
            })?;
        match extension.as_str() {
            "csv" | "tsv" | "txt" | "psv" => Ok(Format::Delimited),
            "xlsx" | "xlsm" => Ok(Format::Spreadsheet),
            other => Err(RetortError::Format(format!(
                "unsupported file extension '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Delimited => "delimited",
            Format::Spreadsheet => "spreadsheet",
        };
        f.write_str(name)
    }
}

/// Decode a byte stream into a table.
pub fn decode(bytes: &[u8], format: Format) -> Result<Table> {
    match format {
        Format::Delimited => {
            delimited::decode(bytes, &delimited::DelimitedConfig::default()).map(|(table, _)| table)
        }
        Format::Spreadsheet => excel::decode(bytes),
    }
}

/// Encode a table into a byte stream.
pub fn encode(table: &Table, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Delimited => delimited::encode(table, b','),
        Format::Spreadsheet => excel::encode(table),
    }
}

/// Metadata about the decoded source bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// SHA-256 hash of the source bytes.
    pub hash: String,
    /// Source size in bytes.
    pub size_bytes: u64,
    /// Detected format.
    pub format: Format,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the data was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Build metadata for bytes that decoded into `table`.
    pub fn new(name: &str, bytes: &[u8], format: Format, table: &Table) -> Self {
        let file = std::path::Path::new(name)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            file,
            hash,
            size_bytes: bytes.len() as u64,
            format,
            row_count: table.row_count(),
            column_count: table.column_count(),
            loaded_at: Utc::now(),
        }
    }
}

/// Build a typed table from a raw string grid.
///
/// Each column gets one strict inference pass; its cells are then parsed
/// under the declared type.
pub(crate) fn table_from_grid(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Table> {
    let mut unique = IndexSet::new();
    for header in &headers {
        if !unique.insert(header.as_str()) {
            return Err(RetortError::Format(format!(
                "duplicate column name '{header}'"
            )));
        }
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (index, name) in headers.into_iter().enumerate() {
        let raw: Vec<&str> = rows
            .iter()
            .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
            .collect();
        let dtype = infer::infer_column_type(&raw);

        let mut values = Vec::with_capacity(raw.len());
        for (row, cell) in raw.iter().enumerate() {
            let parsed = infer::parse_cell(cell, dtype).ok_or_else(|| {
                RetortError::Format(format!(
                    "cell '{cell}' (column '{name}', row {row}) does not parse as {dtype}"
                ))
            })?;
            values.push(parsed);
        }
        columns.push(Column::with_values(name, dtype, values));
    }
    Table::from_columns(columns)
}
