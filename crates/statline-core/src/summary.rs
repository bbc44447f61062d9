//! Column summaries (sum, mean) for the dashboard.
//!
//! Stored values are all text; cells that do not parse as numbers are
//! skipped rather than treated as zero, so a `Season` column like
//! `2009-10` or a `Tm` column never poisons the aggregate.

use serde::Serialize;

use crate::{
  Error, Result,
  table::TableData,
};

/// Aggregates over the numeric cells of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
  pub column: String,
  /// Number of cells that parsed as numeric.
  pub count:  usize,
  pub sum:    f64,
  /// `None` when no cell in the column parsed as numeric.
  pub mean:   Option<f64>,
}

/// Summarize one column of `data`.
///
/// Errors with [`Error::ColumnNotFound`] if `column` is not in the
/// header; a column full of non-numeric cells is not an error.
pub fn column_stats(data: &TableData, column: &str) -> Result<ColumnStats> {
  let idx = data
    .column_index(column)
    .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;

  let mut count = 0usize;
  let mut sum = 0f64;
  for row in &data.rows {
    let Some(cell) = row.get(idx) else { continue };
    if let Ok(v) = cell.trim().parse::<f64>() {
      count += 1;
      sum += v;
    }
  }

  let mean = (count > 0).then(|| sum / count as f64);
  Ok(ColumnStats { column: column.to_string(), count, sum, mean })
}
