//! # Cache Module
//!
//! Keeps the last loaded dataset on disk so restarts do not re-fetch the dump.
//!
//! - [`storage`] - The cache file itself, with 24-hour expiry
//! - [`constants`] - Directory and file names

pub mod constants;
pub mod storage;

pub use storage::DataCache;
