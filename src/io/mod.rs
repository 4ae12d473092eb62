//! File input/output.
//!
//! - baseline uploads (`baseline`)
//! - indicator-code lists, read and written (`codes`)
//! - result table export and re-import (`export`)

pub mod baseline;
pub mod codes;
pub mod export;

pub use baseline::{load_baseline, load_baselines};
pub use codes::{read_codes, write_codes};
pub use export::{read_results_csv, write_results_csv};
