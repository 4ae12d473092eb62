//! Mathematical utilities: correlation statistics and ranking.

pub mod stats;

pub use stats::*;
