//! Constants for cache file and directory names

/// Directory names
pub const CACHE_ROOT_DIR: &str = ".sdk-browser-mcp";
pub const CACHE_DIR: &str = "cache";

/// File names
pub const SDK_CACHE_FILE: &str = "sdk_cache.json";

/// Format version stamped into each cache entry
pub const CACHE_FORMAT_VERSION: &str = "1.0";

/// Cached data older than this is discarded
pub const CACHE_MAX_AGE_HOURS: i64 = 24;
