//! The series provider seam.
//!
//! Everything the analysis engine and the category descent need from the
//! remote catalog goes through this trait, so both can be driven by an
//! in-memory provider in tests.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Category, IndicatorSeries, SeriesMeta};

/// Failure of a single provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status.
    #[error("provider returned status {0}")]
    Status(u16),

    /// The body did not have the expected shape (no usable value column).
    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub trait SeriesProvider {
    /// Direct children of a category (empty for leaf categories).
    fn child_categories(&self, category_id: u32) -> Result<Vec<Category>, ProviderError>;

    /// Series listed directly in a category, at most `limit`.
    fn series_in_category(&self, category_id: u32, limit: usize) -> Result<Vec<SeriesMeta>, ProviderError>;

    /// Observations of `code` dated within `[start, end]`.
    fn series_observations(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IndicatorSeries, ProviderError>;
}
