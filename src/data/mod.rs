//! External data sources.
//!
//! - `provider`: the `SeriesProvider` seam the analysis engine consumes
//! - `fred`: blocking FRED HTTP client implementing it
//! - `categories`: static category table lookups
//! - `descent`: category-tree traversal down to leaf series
//! - `scrape`: listing-page harvester of series codes
//! - `pacing`: request throttling policies

pub mod categories;
pub mod descent;
pub mod fred;
pub mod pacing;
pub mod provider;
pub mod scrape;

pub use categories::CategoryTable;
pub use descent::{DescentOptions, DescentOutcome, collect_series};
pub use fred::FredClient;
pub use pacing::{BatchPause, NoPause, Throttle};
pub use provider::{ProviderError, SeriesProvider};
pub use scrape::{HttpFetcher, PageFetcher, ScrapeError, ScrapeSource};
