//! # SDK Module
//!
//! The dumped class/member database and everything needed to obtain and view
//! it: raw record types, loading and normalization, class detail views and
//! conversion from C++ header dumps.

pub mod convert;
pub mod loader;
pub mod query;
pub mod types;

pub use loader::{GLOBALS_CLASS_NAME, SdkLoader, SdkSource};
pub use query::{ClassDetails, MemberRow, TypeTarget};
pub use types::{ClassRecord, MemberRecord, SdkDataset};
