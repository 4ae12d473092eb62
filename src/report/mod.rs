//! Reporting: ranking of result rows and formatted terminal output.
//!
//! Formatting lives in `format` so the analysis code never builds strings.

pub mod format;

pub use format::*;

use crate::domain::ResultRow;

/// Strength used to rank a row: the larger absolute coefficient.
pub fn strength(row: &ResultRow) -> f64 {
    row.pearson.abs().max(row.spearman.abs())
}

/// The `top_n` strongest rows, strongest first. Ties keep table order.
///
/// `top_n == 0` returns every row in table order.
pub fn strongest(rows: &[ResultRow], top_n: usize) -> Vec<ResultRow> {
    if top_n == 0 {
        return rows.to_vec();
    }
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| strength(b).partial_cmp(&strength(a)).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(top_n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LagResult;

    fn row(code: &str, pearson: f64, spearman: f64) -> ResultRow {
        ResultRow::from_lag(
            "b.csv",
            code,
            &LagResult {
                lag: 0,
                pearson,
                pearson_pval: 0.0,
                spearman,
                spearman_pval: 0.0,
                degenerate: false,
            },
        )
    }

    #[test]
    fn strongest_ranks_by_larger_absolute_coefficient() {
        let rows = vec![row("A", 0.7, 0.1), row("B", -0.2, -0.95), row("C", 0.8, 0.8), row("D", 0.1, 0.1)];
        let top: Vec<String> = strongest(&rows, 2).into_iter().map(|r| r.code).collect();
        assert_eq!(top, vec!["B", "C"]);
        assert_eq!(strongest(&rows, 0).len(), 4);
        assert_eq!(strongest(&rows, 10).len(), 4);
    }
}
