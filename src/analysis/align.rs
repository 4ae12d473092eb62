//! Baseline/indicator alignment.
//!
//! Order matters here:
//! 1. truncate both series by position to the shorter row count
//! 2. require `MIN_SAMPLE_SIZE` rows in the truncated baseline
//! 3. inner-join on exact date equality (baseline order preserved)
//! 4. require `MIN_SAMPLE_SIZE` joined rows
//!
//! The truncation is positional, not a date-range intersection: rows beyond the
//! shorter series' length are dropped before any date is compared.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{BaselineSeries, JoinedRow, MIN_SAMPLE_SIZE, TransformedIndicator};

/// Where in alignment the row count fell short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignStage {
    Truncation,
    Join,
}

impl fmt::Display for AlignStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignStage::Truncation => write!(f, "truncation"),
            AlignStage::Join => write!(f, "date join"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data after {stage}: {rows} rows (need {})", MIN_SAMPLE_SIZE)]
pub struct InsufficientData {
    pub stage: AlignStage,
    pub rows: usize,
}

pub fn align(
    baseline: &BaselineSeries,
    indicator: &TransformedIndicator,
) -> Result<Vec<JoinedRow>, InsufficientData> {
    let rows = baseline.points.len().min(indicator.points.len());
    if rows < MIN_SAMPLE_SIZE {
        return Err(InsufficientData {
            stage: AlignStage::Truncation,
            rows,
        });
    }

    let base = &baseline.points[..rows];
    let ind = &indicator.points[..rows];

    // Provider series have unique dates; if one repeats, its first value wins so
    // each baseline row joins at most once.
    let mut by_date: HashMap<NaiveDate, f64> = HashMap::with_capacity(rows);
    for &(date, value) in ind {
        by_date.entry(date).or_insert(value);
    }

    let joined: Vec<JoinedRow> = base
        .iter()
        .filter_map(|&(date, value)| {
            by_date.get(&date).map(|&indicator_value| JoinedRow {
                baseline_date: date,
                baseline_value: value,
                indicator_date: date,
                indicator_value,
            })
        })
        .collect();

    if joined.len() < MIN_SAMPLE_SIZE {
        return Err(InsufficientData {
            stage: AlignStage::Join,
            rows: joined.len(),
        });
    }

    Ok(joined)
}
