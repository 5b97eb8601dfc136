//! Output types for class browsing tools
//!
//! These types are used as the return values from class tool methods.
//! They are serialized to JSON strings for the MCP protocol, and can be
//! deserialized in tests for type-safe validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sdk::{ClassDetails, TypeTarget};
use crate::search::QuickHit;

/// Sidebar entry for one class
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ClassSummary {
    pub name: String,
    pub type_tag: String,
    pub parent: String,
    pub size_hex: String,
    pub member_count: usize,
}

/// Pagination information
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaginationInfo {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Output from list_classes operation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ListClassesOutput {
    pub classes: Vec<ClassSummary>,
    pub pagination: PaginationInfo,
}

impl ListClassesOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Output from get_class operation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct GetClassOutput {
    /// Class details; `members` holds only the rows kept by the member filter
    pub class: ClassDetails,
    /// Row of the requested member within the unfiltered layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub located_row: Option<usize>,
}

impl GetClassOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Output from resolve_type operation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ResolveTypeOutput {
    pub type_name: String,
    pub resolution: TypeTarget,
    /// Quick-search hits for unresolved types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<QuickHit>,
}

impl ResolveTypeOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Output from reload_sdk operation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReloadOutput {
    pub source: String,
    pub classes: usize,
    pub members: usize,
    pub loaded_at: DateTime<Utc>,
}

impl ReloadOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Error output for class tools
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ClassesErrorOutput {
    pub error: String,
}

impl ClassesErrorOutput {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_output_serialization() {
        let output = ResolveTypeOutput {
            type_name: "APawn*".to_string(),
            resolution: TypeTarget::Class("APawn".to_string()),
            hits: Vec::new(),
        };
        let json: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(json["resolution"]["target"], "class");
        assert_eq!(json["resolution"]["name"], "APawn");
        assert!(json.get("hits").is_none());

        let back: ResolveTypeOutput = serde_json::from_value(json).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_basic_target_has_no_name() {
        let output = ResolveTypeOutput {
            type_name: "int32_t".to_string(),
            resolution: TypeTarget::Basic,
            hits: Vec::new(),
        };
        let json: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(json["resolution"]["target"], "basic");
    }

    #[test]
    fn test_error_output() {
        let output = ClassesErrorOutput::new("Class 'Foo' not found");
        let deserialized: ClassesErrorOutput = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(output, deserialized);
    }
}
