//! # Search Configuration Module
//!
//! Constants that bound result sizes, fuzzy tolerance and input debouncing.

use std::time::Duration;

/// Maximum number of ranked results returned by the advanced search
pub const MAX_RESULTS: usize = 250;

/// Fuzzy fallback runs only while exact results are below this count
pub const FUZZY_THRESHOLD: usize = 15;

/// Largest edit distance admitted as a fuzzy match
pub const MAX_FUZZY_DISTANCE: usize = 2;

/// Maximum number of hits shown by the quick-search dropdown
pub const QUICK_SEARCH_LIMIT: usize = 30;

/// Quiet period before the advanced search runs
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Quiet period before the sidebar class filter runs
pub const CLASS_FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Quiet period before the quick-search dropdown runs
pub const QUICK_SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Tunables for the search orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_results: usize,
    pub fuzzy_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            fuzzy_threshold: FUZZY_THRESHOLD,
        }
    }
}
