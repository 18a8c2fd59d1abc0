//! Retort: interactive cleaning and transformation of tabular datasets.
//!
//! Retort decodes a delimited-text or spreadsheet byte stream into a typed
//! in-memory [`Table`], applies a user-selected sequence of pure
//! transformation operations, computes descriptive statistics, and encodes
//! the result back to bytes for download.
//!
//! # Core Principles
//!
//! - **Typed once**: column types are inferred at decode time and consulted,
//!   never re-derived, by every operation
//! - **Functional**: each operation produces a new table; a failed operation
//!   leaves the current table untouched
//! - **Deterministic**: division by zero and degenerate normalization fail
//!   explicitly instead of propagating NaN or infinity
//!
//! # Example
//!
//! ```
//! use retort::{decode, Format, TransformEngine, TransformOperation};
//!
//! let bytes = b"name,price\nwidget,10\ngadget,0\n";
//! let table = decode(bytes, Format::Delimited)?;
//!
//! let engine = TransformEngine::new();
//! let applied = engine.apply(
//!     &TransformOperation::ReplaceZero { replacement: 5.0 },
//!     &table,
//! )?;
//! assert_eq!(applied.table.row_count(), 2);
//! # Ok::<(), retort::RetortError>(())
//! ```

pub mod codec;
pub mod coerce;
pub mod error;
pub mod infer;
pub mod schema;
pub mod session;
pub mod stats;
pub mod transform;

pub use codec::{decode, encode, Format, SourceMetadata};
pub use error::{Result, RetortError};
pub use schema::{Column, ColumnType, Table, Value};
pub use session::Session;
pub use stats::{column_summary, ColumnSummary};
pub use transform::{
    Applied, ArithmeticOp, FilterOp, TextKind, TransformChange, TransformEngine,
    TransformOperation,
};
