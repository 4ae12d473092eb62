//! Percent-change transform applied to raw indicator values before alignment.
//!
//! ```text
//! out[t] = (raw[t] - raw[t-N]) / raw[t-N] * 100    for t >= N
//! out[t] = 0                                        for t <  N
//! ```
//!
//! A missing observation takes the last valid value before it, so a gap does
//! not zero the changes that follow it. Positions with no earlier valid value,
//! division by zero and any other non-finite result become `0`. With `N = 0`
//! the raw values pass through unchanged (missing -> 0).

use crate::domain::{IndicatorSeries, TransformedIndicator};

pub fn transform(raw: &[Option<f64>], change_interval: usize) -> Vec<f64> {
    if change_interval == 0 {
        return raw.iter().map(|v| finite_or_zero(v.unwrap_or(0.0))).collect();
    }

    let padded = pad_forward(raw);
    (0..padded.len())
        .map(|t| {
            if t < change_interval {
                return 0.0;
            }
            match (padded[t], padded[t - change_interval]) {
                (Some(cur), Some(prev)) => finite_or_zero((cur - prev) / prev * 100.0),
                _ => 0.0,
            }
        })
        .collect()
}

/// Transform an indicator's observations, keeping their dates.
pub fn transform_indicator(series: &IndicatorSeries, change_interval: usize) -> TransformedIndicator {
    let values = transform(&series.raw_values(), change_interval);
    TransformedIndicator {
        code: series.code.clone(),
        points: series
            .observations
            .iter()
            .zip(values)
            .map(|((date, _), v)| (*date, v))
            .collect(),
    }
}

/// Carry the last finite value over missing or non-finite entries.
fn pad_forward(raw: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    raw.iter()
        .map(|v| {
            if let Some(v) = v.filter(|v| v.is_finite()) {
                last = Some(v);
            }
            last
        })
        .collect()
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}
