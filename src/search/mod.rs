//! # Search Module
//!
//! Ranked search over the SDK's classes and members, built for interactive
//! typing: the whole pipeline is a linear scan over a flat index, with no
//! suspension points.
//!
//! ## Key Components
//!
//! - [`index`] - Flat class and member lists built from a dataset
//! - [`scorer`] - Exact, prefix, substring and hex-offset scoring
//! - [`fuzzy`] - Levenshtein fallback for near misses
//! - [`engine`] - Runs a query, merges fuzzy results, sorts and truncates
//! - [`highlight`] - Highlight spans and escaped markup
//! - [`navigation`] - Keyboard focus and activation over a result list
//! - [`quick`] - Sidebar class filter and quick-search dropdown
//! - [`debounce`] - Input debouncing and stale-result guard
//! - [`tools`] - MCP tool implementations for search operations
//! - [`config`] - Result limits, fuzzy tolerance and debounce delays

pub mod config;
pub mod debounce;
pub mod engine;
pub mod fuzzy;
pub mod highlight;
pub mod index;
pub mod navigation;
pub mod outputs;
pub mod quick;
pub mod scorer;
pub mod tools;

pub use config::SearchConfig;
pub use engine::{SearchEngine, SearchOutcome, SearchQuery, SearchResult, search};
pub use highlight::{HighlightSpan, highlight, highlight_offset};
pub use index::SearchIndex;
pub use navigation::{NavKey, ResultNavigator, SearchSession};
pub use quick::{ClassFilter, QuickHit, quick_search};
pub use tools::SearchTools;
