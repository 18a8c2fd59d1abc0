//! The catalog of transformation operations.

use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// A transformation to apply to the current table.
///
/// Operations are pure: each consumes a table and produces a new one, or
/// fails leaving the input unchanged. The enum serializes to JSON so a
/// pipeline can be stored and replayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransformOperation {
    /// Remove every row containing a null in any column.
    DropNulls,

    /// Rescale every numeric column to [0, 1] via (v - min) / (max - min).
    /// Fails on constant columns rather than emitting NaN.
    NormalizeNumeric,

    /// Replace every numeric cell equal to zero with `replacement`.
    ReplaceZero { replacement: f64 },

    /// Remove rows that duplicate an earlier row across all columns.
    DropDuplicates,

    /// Keep rows where the cell in `column` compares against `value`.
    /// Rows with a null cell are dropped.
    FilterRows {
        column: String,
        op: FilterOp,
        value: f64,
    },

    /// Keep rows whose value lies within
    /// [Q1 - threshold * IQR, Q3 + threshold * IQR]. Rows with a null cell
    /// are kept.
    RemoveOutliers { column: String, threshold: f64 },

    /// Split each cell's string form on `delimiter` into columns
    /// `{column}_part_{i}` (1-indexed up to the widest row).
    SplitColumn { column: String, delimiter: String },

    /// Join the selected columns' string forms per row into a new
    /// `combined_column`.
    CombineColumns {
        columns: Vec<String>,
        separator: String,
    },

    /// Elementwise arithmetic between two numeric columns into `name`.
    /// Division by zero fails rather than yielding infinity.
    CalculatedColumn {
        left: String,
        op: ArithmeticOp,
        right: String,
        name: String,
    },

    /// Stable sort of all rows by `column`; nulls sort last either way.
    SortRows { column: String, ascending: bool },

    /// Apply a text transformation to a string column.
    TextTransform { column: String, kind: TextKind },

    /// Cast every cell of `column` to `target`, atomically.
    ConvertType { column: String, target: ColumnType },
}

/// Comparison operator for row filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    GreaterThan,
    LessThan,
    EqualTo,
}

impl FilterOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::GreaterThan => ">",
            FilterOp::LessThan => "<",
            FilterOp::EqualTo => "==",
        }
    }
}

/// Arithmetic operator for calculated columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        }
    }
}

/// Text transformation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    Lowercase,
    Trim,
    StripSpecialChars,
}

impl TextKind {
    fn label(&self) -> &'static str {
        match self {
            TextKind::Lowercase => "lowercase",
            TextKind::Trim => "trim",
            TextKind::StripSpecialChars => "strip special characters",
        }
    }
}

impl TransformOperation {
    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            TransformOperation::DropNulls => "Drop rows containing null values".to_string(),
            TransformOperation::NormalizeNumeric => {
                "Normalize numeric columns to [0, 1]".to_string()
            }
            TransformOperation::ReplaceZero { replacement } => {
                format!("Replace zero values with {replacement}")
            }
            TransformOperation::DropDuplicates => "Drop duplicate rows".to_string(),
            TransformOperation::FilterRows { column, op, value } => {
                format!("Keep rows where '{column}' {} {value}", op.symbol())
            }
            TransformOperation::RemoveOutliers { column, threshold } => {
                format!("Remove outliers in '{column}' beyond {threshold} x IQR")
            }
            TransformOperation::SplitColumn { column, delimiter } => {
                format!("Split '{column}' on '{delimiter}'")
            }
            TransformOperation::CombineColumns { columns, separator } => {
                format!(
                    "Combine columns {} with '{separator}'",
                    columns.join(", ")
                )
            }
            TransformOperation::CalculatedColumn {
                left,
                op,
                right,
                name,
            } => {
                format!("Create '{name}' = '{left}' {} '{right}'", op.symbol())
            }
            TransformOperation::SortRows { column, ascending } => {
                let direction = if *ascending { "ascending" } else { "descending" };
                format!("Sort rows by '{column}' ({direction})")
            }
            TransformOperation::TextTransform { column, kind } => {
                format!("Apply {} to '{column}'", kind.label())
            }
            TransformOperation::ConvertType { column, target } => {
                format!("Convert '{column}' to {target}")
            }
        }
    }
}

/// Record of one applied operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformChange {
    /// Description of the operation that ran.
    pub description: String,

    /// Row count before the operation.
    pub rows_before: usize,

    /// Row count after the operation.
    pub rows_after: usize,

    /// Names of columns the operation added.
    pub columns_added: Vec<String>,
}
