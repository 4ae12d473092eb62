//! Category-tree descent to leaf series.
//!
//! Starting from a set of root categories, walk down the provider's category
//! tree with an explicit stack. Leaf categories (no children) contribute the
//! series listed in them; interior categories contribute their children. The
//! walk is bounded by `max_depth` and paced by an injected `Throttle`.

use std::collections::HashSet;

use crate::data::pacing::Throttle;
use crate::data::provider::{ProviderError, SeriesProvider};
use crate::domain::SeriesMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescentOptions {
    /// Depth (roots are depth 0) below which children are no longer followed.
    pub max_depth: usize,
    /// Maximum series requested per leaf category.
    pub limit: usize,
}

impl Default for DescentOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            limit: 1000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DescentOutcome {
    /// Unique series in traversal order.
    pub series: Vec<SeriesMeta>,
    pub leaves_visited: usize,
    /// Categories at `max_depth` that still had children.
    pub truncated: Vec<u32>,
    /// Categories whose requests failed; they contribute nothing.
    pub failures: Vec<(u32, ProviderError)>,
}

pub fn collect_series(
    provider: &dyn SeriesProvider,
    roots: &[u32],
    options: &DescentOptions,
    throttle: &mut dyn Throttle,
) -> DescentOutcome {
    let mut outcome = DescentOutcome::default();
    let mut seen: HashSet<String> = HashSet::new();

    for &root in roots {
        let mut stack: Vec<(u32, usize)> = vec![(root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let children = match provider.child_categories(id) {
                Ok(children) => children,
                Err(e) => {
                    log::warn!("Category {id}: child lookup failed: {e}");
                    outcome.failures.push((id, e));
                    continue;
                }
            };

            if children.is_empty() {
                outcome.leaves_visited += 1;
                match provider.series_in_category(id, options.limit) {
                    Ok(series) => {
                        log::debug!("Category {id}: {} series", series.len());
                        for meta in series {
                            if seen.insert(meta.id.clone()) {
                                outcome.series.push(meta);
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("Category {id}: series lookup failed: {e}");
                        outcome.failures.push((id, e));
                    }
                }
                throttle.tick();
            } else if depth >= options.max_depth {
                log::info!(
                    "Category {id}: {} subcategories below depth {}, not followed",
                    children.len(),
                    options.max_depth
                );
                outcome.truncated.push(id);
            } else {
                // Reverse so children are visited in provider order.
                for child in children.into_iter().rev() {
                    stack.push((child.id, depth + 1));
                }
            }
        }

        log::info!("Category {root}: gathered, {} series so far", outcome.series.len());
        throttle.tick();
    }

    outcome
}
