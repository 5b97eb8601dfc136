//! Output types for search tools
//!
//! These types are used as the return values from search tool methods.
//! They are serialized to JSON strings for the MCP protocol, and can be
//! deserialized in tests for type-safe validation.

use serde::{Deserialize, Serialize};

use crate::search::engine::SearchResult;
use crate::search::highlight::RenderedResult;
use crate::search::quick::QuickHit;

/// One ranked result with its highlighted rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub result: SearchResult,
    pub rendered: RenderedResult,
}

/// Output from search_sdk operation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchSdkOutput {
    pub query: String,
    /// Footer line, e.g. `3 results in 0.4ms`
    pub status: String,
    /// Number of ranked results before the response limit was applied
    pub total_results: usize,
    pub elapsed_ms: f64,
    pub results: Vec<SearchHit>,
}

impl SearchSdkOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Output from quick_search operation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct QuickSearchOutput {
    pub query: String,
    pub hits: Vec<QuickHit>,
}

impl QuickSearchOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Error output for search tools
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchErrorOutput {
    pub error: String,
}

impl SearchErrorOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize error"}"#.to_string())
    }
}
