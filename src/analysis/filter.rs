//! Threshold filtering over a finished result table.

use crate::domain::{ResultRow, Thresholds};

/// Keep rows with `|pearson| >= t.pearson` and `|spearman| >= t.spearman`.
///
/// Row order is preserved.
pub fn filter_rows(rows: &[ResultRow], thresholds: Thresholds) -> Vec<ResultRow> {
    rows.iter()
        .filter(|r| passes(r, thresholds))
        .cloned()
        .collect()
}

pub fn passes(row: &ResultRow, thresholds: Thresholds) -> bool {
    row.pearson.abs() >= thresholds.pearson && row.spearman.abs() >= thresholds.spearman
}
