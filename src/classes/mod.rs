//! # Classes Module
//!
//! MCP tools for browsing the loaded dump: the sorted class list, class
//! layouts with member filtering, type navigation and reloading.

pub mod outputs;
pub mod tools;

pub use tools::ClassTools;
