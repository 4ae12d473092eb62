//! Full analysis run: every baseline against every indicator code.
//!
//! For each pair, in the order given:
//! 1. fetch observations for the baseline's `[min_date, max_date]` window
//! 2. percent-change transform
//! 3. truncate + date join (`InsufficientData` skips the pair)
//! 4. per-lag correlation, rows appended to the run's table
//!
//! Per-pair failures never abort the run: every provider error becomes a
//! `SkippedPair` with an explicit reason. The table is only handed out once the
//! run has finished (or stopped at a cancellation check).

use std::fmt;

use chrono::NaiveDate;

use crate::analysis::align::{AlignStage, InsufficientData, align};
use crate::analysis::cancel::CancelToken;
use crate::analysis::lag::correlate;
use crate::analysis::transform::transform_indicator;
use crate::data::pacing::Throttle;
use crate::data::provider::{ProviderError, SeriesProvider};
use crate::domain::{AnalysisConfig, BaselineSeries, IndicatorCode, LagResult, ResultRow};

/// Why a (baseline, indicator) pair produced no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    InsufficientData(InsufficientData),
    /// The provider answered, but not with usable observations.
    ProviderDataMissing(String),
    /// The request itself failed (transport error or HTTP status).
    ProviderFailure(String),
}

impl From<InsufficientData> for SkipReason {
    fn from(value: InsufficientData) -> Self {
        SkipReason::InsufficientData(value)
    }
}

impl From<ProviderError> for SkipReason {
    fn from(value: ProviderError) -> Self {
        match value {
            ProviderError::Malformed(msg) => SkipReason::ProviderDataMissing(msg),
            e @ (ProviderError::Request(_) | ProviderError::Status(_)) => SkipReason::ProviderFailure(e.to_string()),
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientData(e) => write!(f, "{e}"),
            SkipReason::ProviderDataMissing(msg) => write!(f, "no usable data: {msg}"),
            SkipReason::ProviderFailure(msg) => write!(f, "provider failure: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPair {
    pub baseline: String,
    pub code: String,
    pub reason: SkipReason,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutcome {
    /// Grouped by baseline, then code, then ascending lag.
    pub rows: Vec<ResultRow>,
    pub skipped: Vec<SkippedPair>,
    /// Pairs that produced rows.
    pub pairs_analyzed: usize,
    /// Pairs attempted (analyzed + skipped).
    pub pairs_attempted: usize,
    /// `true` if the run stopped early at a cancellation check.
    pub cancelled: bool,
}

impl AnalysisOutcome {
    pub fn skipped_for_insufficient_data(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::InsufficientData(_)))
            .count()
    }

    pub fn skipped_for_provider(&self) -> usize {
        self.skipped.len() - self.skipped_for_insufficient_data()
    }
}

pub fn run_analysis(
    baselines: &[BaselineSeries],
    codes: &[IndicatorCode],
    config: &AnalysisConfig,
    provider: &dyn SeriesProvider,
    throttle: &mut dyn Throttle,
    cancel: &CancelToken,
) -> AnalysisOutcome {
    let mut outcome = AnalysisOutcome::default();

    'baselines: for baseline in baselines {
        log::info!("Analyzing baseline '{}' ({} rows)", baseline.name, baseline.len());
        throttle.restart();
        let window = baseline.min_date().zip(baseline.max_date());

        for code in codes {
            if cancel.is_cancelled() {
                log::warn!(
                    "Run cancelled after {} pair(s); keeping {} row(s)",
                    outcome.pairs_attempted,
                    outcome.rows.len()
                );
                outcome.cancelled = true;
                break 'baselines;
            }

            outcome.pairs_attempted += 1;
            let result = match window {
                Some((start, end)) => analyze_pair(baseline, &code.code, start, end, config, provider),
                None => Err(SkipReason::InsufficientData(InsufficientData {
                    stage: AlignStage::Truncation,
                    rows: 0,
                })),
            };

            match result {
                Ok(lags) => {
                    log::debug!("{} x {}: {} lag(s)", baseline.name, code.code, lags.len());
                    outcome.pairs_analyzed += 1;
                    outcome
                        .rows
                        .extend(lags.iter().map(|r| ResultRow::from_lag(&baseline.name, &code.code, r)));
                }
                Err(reason) => {
                    match &reason {
                        SkipReason::InsufficientData(_) => {
                            log::debug!("{} x {}: skipped, {reason}", baseline.name, code.code)
                        }
                        _ => log::warn!("{} x {}: skipped, {reason}", baseline.name, code.code),
                    }
                    outcome.skipped.push(SkippedPair {
                        baseline: baseline.name.clone(),
                        code: code.code.clone(),
                        reason,
                    });
                }
            }

            throttle.tick();
        }
    }

    log::info!(
        "Analysis finished: {} pair(s) analyzed, {} skipped, {} row(s)",
        outcome.pairs_analyzed,
        outcome.skipped.len(),
        outcome.rows.len()
    );
    outcome
}

fn analyze_pair(
    baseline: &BaselineSeries,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
    config: &AnalysisConfig,
    provider: &dyn SeriesProvider,
) -> Result<Vec<LagResult>, SkipReason> {
    let series = provider.series_observations(code, start, end)?;
    let transformed = transform_indicator(&series, config.change_interval);
    let joined = align(baseline, &transformed)?;
    Ok(correlate(&joined, config.max_lag))
}
