//! Descriptive statistics over a numeric column.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetortError};
use crate::schema::Table;

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Number of non-null values the summary covers.
    pub count: usize,
    pub mean: f64,
    /// Linear-interpolated 50th percentile.
    pub median: f64,
    /// Most frequent value(s), ascending; ties return all.
    pub modes: Vec<f64>,
    /// Sample standard deviation (n - 1); 0.0 for a single value.
    pub std_dev: f64,
}

/// Compute mean, median, mode(s), and sample standard deviation for a
/// numeric column, ignoring nulls.
pub fn column_summary(table: &Table, column: &str) -> Result<ColumnSummary> {
    let target = table.column(column)?;
    if !target.dtype.is_numeric() {
        return Err(RetortError::Schema(format!(
            "statistics require a numeric column, '{}' is {}",
            column, target.dtype
        )));
    }

    let mut values = target.non_null_f64s();
    if values.is_empty() {
        return Err(RetortError::EmptyColumn(column.to_string()));
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let median = quantile(&values, 0.5);
    let modes = modes(&values);
    let std_dev = if count < 2 {
        0.0
    } else {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (count - 1) as f64).sqrt()
    };

    Ok(ColumnSummary {
        count,
        mean,
        median,
        modes,
        std_dev,
    })
}

/// Linear-interpolated quantile over an ascending-sorted slice.
///
/// `q` is a fraction in [0, 1]. Returns 0.0 for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    let fraction = position - low as f64;
    sorted[low] + (sorted[high] - sorted[low]) * fraction
}

/// All values sharing the highest frequency, in ascending order.
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut best_run = 0;
    let mut modes = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        let run = end - start;
        if run > best_run {
            best_run = run;
            modes.clear();
            modes.push(sorted[start]);
        } else if run == best_run {
            modes.push(sorted[start]);
        }
        start = end;
    }
    modes
}
