//! Lagged correlation over a joined row set.
//!
//! For lag `l` the baseline is shifted forward relative to the indicator:
//!
//! ```text
//! baseline[l..N]  vs  indicator[0..N-l]
//! ```
//!
//! i.e. the baseline "lags" the indicator by `l` periods. Each lag is evaluated
//! independently; an undefined statistic only zeroes that lag.

use rayon::prelude::*;

use crate::domain::{JoinedRow, LagResult, MIN_SAMPLE_SIZE};
use crate::math::{pearson, spearman};

/// Correlate baseline vs indicator values for lags `0..=max_lag`.
///
/// Returns no results when fewer than `MIN_SAMPLE_SIZE` rows are supplied,
/// otherwise exactly `max_lag + 1` results in increasing lag order.
pub fn correlate(joined: &[JoinedRow], max_lag: usize) -> Vec<LagResult> {
    if joined.len() < MIN_SAMPLE_SIZE {
        return Vec::new();
    }

    let base: Vec<f64> = joined.iter().map(|r| r.baseline_value).collect();
    let ind: Vec<f64> = joined.iter().map(|r| r.indicator_value).collect();

    (0..=max_lag)
        .into_par_iter()
        .map(|lag| lag_result(&base, &ind, lag))
        .collect()
}

fn lag_result(base: &[f64], ind: &[f64], lag: usize) -> LagResult {
    let n = base.len();
    if lag >= n {
        return LagResult::undefined(lag);
    }

    let x = &base[lag..];
    let y = &ind[..n - lag];

    match (pearson(x, y), spearman(x, y)) {
        (Some(p), Some(s)) => LagResult {
            lag,
            pearson: p.coefficient,
            pearson_pval: p.p_value,
            spearman: s.coefficient,
            spearman_pval: s.p_value,
            degenerate: false,
        },
        _ => LagResult::undefined(lag),
    }
}
