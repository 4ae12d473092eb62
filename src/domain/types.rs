//! Shared domain types.
//!
//! Series are kept as plain `(date, value)` vectors; nothing here knows about
//! HTTP or CSV. The record types that cross a file boundary (`ResultRow`,
//! `IndicatorCode`, `Category`) derive serde so the `io` module can read and
//! write them directly.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum number of rows a pair needs, both after positional truncation and
/// after the date join, before any statistic is computed.
pub const MIN_SAMPLE_SIZE: usize = 15;

/// A user-supplied reference series, keyed by its upload file name.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl BaselineSeries {
    pub fn new(name: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|(d, _)| *d).min()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|(d, _)| *d).max()
    }

    /// Snap every date to the first day of its quarter.
    ///
    /// Used for quarterly uploads whose dates fall mid-quarter or on the last
    /// day of a quarter, so they line up with FRED's quarterly observation dates.
    pub fn normalize_quarterly(&mut self) {
        for (date, _) in &mut self.points {
            *date = quarter_start(*date);
        }
    }
}

/// First day of the quarter containing `date` (Jan/Apr/Jul/Oct 1st).
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    // Day 1 of months 1/4/7/10 always exists.
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// Raw observations for one indicator code, as returned by the provider.
///
/// `None` marks a missing/non-numeric observation (FRED reports these as `"."`).
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub code: String,
    pub observations: Vec<(NaiveDate, Option<f64>)>,
}

impl IndicatorSeries {
    pub fn raw_values(&self) -> Vec<Option<f64>> {
        self.observations.iter().map(|(_, v)| *v).collect()
    }
}

/// Indicator values after the percent-change transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedIndicator {
    pub code: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// One row of the baseline/indicator date join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRow {
    pub baseline_date: NaiveDate,
    pub baseline_value: f64,
    pub indicator_date: NaiveDate,
    pub indicator_value: f64,
}

/// Correlation statistics for one lag of one (baseline, indicator) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagResult {
    pub lag: usize,
    pub pearson: f64,
    pub pearson_pval: f64,
    pub spearman: f64,
    pub spearman_pval: f64,
    /// `true` when the statistic was undefined and the four values were set to 0.
    pub degenerate: bool,
}

impl LagResult {
    /// The all-zero result recorded when a lag's statistic is undefined.
    pub fn undefined(lag: usize) -> Self {
        Self {
            lag,
            pearson: 0.0,
            pearson_pval: 0.0,
            spearman: 0.0,
            spearman_pval: 0.0,
            degenerate: true,
        }
    }
}

/// One row of the result table: a `LagResult` tagged with its pair.
///
/// Field order and serde names match the results CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub lag: usize,
    #[serde(rename = "pearsoncorr")]
    pub pearson: f64,
    pub pearson_pval: f64,
    #[serde(rename = "spearmancorr")]
    pub spearman: f64,
    pub spearman_pval: f64,
    #[serde(rename = "baseline_data")]
    pub baseline: String,
    #[serde(rename = "indicator_code")]
    pub code: String,
    #[serde(skip)]
    pub degenerate: bool,
}

impl ResultRow {
    pub fn from_lag(baseline: &str, code: &str, result: &LagResult) -> Self {
        Self {
            lag: result.lag,
            pearson: result.pearson,
            pearson_pval: result.pearson_pval,
            spearman: result.spearman,
            spearman_pval: result.spearman_pval,
            baseline: baseline.to_string(),
            code: code.to_string(),
            degenerate: result.degenerate,
        }
    }
}

/// A candidate indicator: series code plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorCode {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl IndicatorCode {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A node of the provider's category tree. Top-level categories have parent 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub parent_id: u32,
}

/// Catalog metadata for a series listed in a category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesMeta {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub frequency_short: String,
    #[serde(default)]
    pub units_short: String,
    #[serde(default)]
    pub seasonal_adjustment_short: String,
}

impl From<&SeriesMeta> for IndicatorCode {
    fn from(meta: &SeriesMeta) -> Self {
        IndicatorCode::new(meta.id.clone(), meta.title.clone())
    }
}

/// Per-run analysis settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Periods for the percent-change transform; `0` keeps raw values.
    pub change_interval: usize,
    /// Largest lag (inclusive) by which the baseline is shifted.
    pub max_lag: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            change_interval: 1,
            max_lag: 5,
        }
    }
}

/// Minimum absolute coefficients a result row must reach to be shown/exported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub pearson: f64,
    pub spearman: f64,
}

impl Thresholds {
    pub fn new(pearson: f64, spearman: f64) -> Result<Self, AppError> {
        for (label, v) in [("pearson", pearson), ("spearman", spearman)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(AppError::input(format!(
                    "Invalid {label} threshold {v}: expected a value in [0, 1]."
                )));
            }
        }
        Ok(Self { pearson, spearman })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pearson: 0.65,
            spearman: 0.65,
        }
    }
}
