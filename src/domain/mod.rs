//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - uploaded and fetched series (`BaselineSeries`, `IndicatorSeries`)
//! - aligned rows and per-lag statistics (`JoinedRow`, `LagResult`)
//! - the exported result rows (`ResultRow`)
//! - catalog records (`IndicatorCode`, `Category`, `SeriesMeta`)
//! - run settings (`AnalysisConfig`, `Thresholds`)

pub mod types;

pub use types::*;
