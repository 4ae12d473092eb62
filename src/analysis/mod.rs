//! The correlation analysis engine.
//!
//! Pipeline per (baseline, indicator) pair:
//! provider fetch -> percent-change transform -> positional truncation + date
//! join -> per-lag Pearson/Spearman -> rows appended to the run's table.
//!
//! `filter` narrows a finished table by coefficient thresholds.

pub mod align;
pub mod cancel;
pub mod filter;
pub mod lag;
pub mod orchestrator;
pub mod transform;

pub use align::{AlignStage, InsufficientData, align};
pub use cancel::CancelToken;
pub use filter::filter_rows;
pub use lag::correlate;
pub use orchestrator::{AnalysisOutcome, SkipReason, SkippedPair, run_analysis};
pub use transform::{transform, transform_indicator};
