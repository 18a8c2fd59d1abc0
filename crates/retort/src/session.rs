//! A cleaning session: the current table plus the log of applied operations.
//!
//! The session is the explicit state object the UI collaborator holds. It
//! owns one table at a time; each successful operation swaps in the new
//! table and appends to the history, and a failed operation changes nothing.

use std::path::Path;

use crate::codec::{delimited, excel, Format, SourceMetadata};
use crate::error::{Result, RetortError};
use crate::schema::Table;
use crate::stats::{self, ColumnSummary};
use crate::transform::{TransformChange, TransformEngine, TransformOperation};

/// One user's in-memory cleaning session.
#[derive(Debug)]
pub struct Session {
    table: Table,
    source: SourceMetadata,
    format: Format,
    /// Delimiter of the uploaded stream, mirrored on export.
    delimiter: Option<u8>,
    history: Vec<TransformChange>,
}

impl Session {
    /// Open a session from uploaded bytes; the format is detected from the
    /// file name's extension.
    pub fn open(name: &str, bytes: &[u8]) -> Result<Self> {
        let format = Format::from_name(name)?;
        let (table, delimiter) = match format {
            Format::Delimited => {
                let (table, delimiter) =
                    delimited::decode(bytes, &delimited::DelimitedConfig::default())?;
                (table, Some(delimiter))
            }
            Format::Spreadsheet => (excel::decode(bytes)?, None),
        };
        let source = SourceMetadata::new(name, bytes, format, &table);

        Ok(Self {
            table,
            source,
            format,
            delimiter,
            history: Vec::new(),
        })
    }

    /// Open a session by reading a file from disk.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| RetortError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Session::open(&path.to_string_lossy(), &bytes)
    }

    /// The current table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Metadata about the uploaded source.
    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    /// The linear log of applied operations.
    pub fn history(&self) -> &[TransformChange] {
        &self.history
    }

    /// Apply one operation to the current table. On success the session
    /// advances to the new table; on error it is left exactly as it was.
    pub fn apply(&mut self, operation: &TransformOperation) -> Result<TransformChange> {
        let engine = TransformEngine::new();
        let applied = engine.apply(operation, &self.table)?;
        self.table = applied.table;
        self.history.push(applied.change.clone());
        Ok(applied.change)
    }

    /// Descriptive statistics over a numeric column of the current table.
    pub fn summary(&self, column: &str) -> Result<ColumnSummary> {
        stats::column_summary(&self.table, column)
    }

    /// Encode the current table in the format it was uploaded in.
    pub fn export(&self) -> Result<Vec<u8>> {
        match self.format {
            Format::Delimited => delimited::encode(&self.table, self.delimiter.unwrap_or(b',')),
            Format::Spreadsheet => excel::encode(&self.table),
        }
    }

    /// File name offered for download.
    pub fn download_name(&self) -> String {
        format!("transformado_{}", self.source.file)
    }
}
