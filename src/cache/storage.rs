use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::constants::{
    CACHE_DIR, CACHE_FORMAT_VERSION, CACHE_MAX_AGE_HOURS, CACHE_ROOT_DIR, SDK_CACHE_FILE,
};
use crate::sdk::SdkDataset;

/// On-disk cache of the normalized dataset.
///
/// Each entry records the source key it was loaded from. Entries expire after
/// 24 hours. A corrupt entry, an entry for another source, or one written by
/// another format version is removed and treated as a miss; cache problems
/// never fail a load.
#[derive(Debug, Clone)]
pub struct DataCache {
    cache_dir: PathBuf,
    max_age: Duration,
}

/// What is written to `sdk_cache.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: SdkDataset,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    /// Data and globals sources the entry was loaded from
    #[serde(default)]
    pub source: String,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.timestamp) > max_age
    }
}

impl DataCache {
    /// Create a new cache rooted at `custom_cache_dir`, or at
    /// `~/.sdk-browser-mcp/cache` when none is given
    pub fn new(custom_cache_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_cache_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("Failed to get home directory")?
                .join(CACHE_ROOT_DIR)
                .join(CACHE_DIR),
        };

        fs::create_dir_all(&cache_dir).with_context(|| {
            format!("Failed to create cache directory: {}", cache_dir.display())
        })?;

        Ok(Self {
            cache_dir,
            max_age: Duration::hours(CACHE_MAX_AGE_HOURS),
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn entry_path(&self) -> PathBuf {
        self.cache_dir.join(SDK_CACHE_FILE)
    }

    /// Load the entry cached for `source` if present and fresh
    pub fn load(&self, source: &str) -> Option<CacheEntry> {
        self.load_at(source, Utc::now())
    }

    /// Load relative to an explicit clock, so expiry can be tested
    pub fn load_at(&self, source: &str, now: DateTime<Utc>) -> Option<CacheEntry> {
        let path = self.entry_path();
        if !path.exists() {
            return None;
        }

        let entry = match self.read_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Failed to load from cache: {:#}", e);
                self.clear();
                return None;
            }
        };

        if entry.version != CACHE_FORMAT_VERSION {
            tracing::debug!("Discarding cache entry with format version {}", entry.version);
            self.clear();
            return None;
        }

        if entry.source != source {
            tracing::debug!("Cache entry belongs to '{}', not '{}'", entry.source, source);
            self.clear();
            return None;
        }

        if entry.is_expired(now, self.max_age) {
            tracing::debug!("Cache entry from {} expired", entry.timestamp);
            self.clear();
            return None;
        }

        Some(entry)
    }

    fn read_entry(&self, path: &Path) -> Result<CacheEntry> {
        let content = fs::read(path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
        serde_json::from_slice(&content).context("Failed to parse cache entry")
    }

    /// Store the dataset loaded from `source`, stamped with the current time
    pub fn save(&self, source: &str, dataset: &SdkDataset) {
        self.save_at(source, dataset, Utc::now());
    }

    pub fn save_at(&self, source: &str, dataset: &SdkDataset, timestamp: DateTime<Utc>) {
        if let Err(e) = self.write_entry(source, dataset, timestamp) {
            tracing::warn!("Failed to cache data: {:#}", e);
        } else {
            tracing::debug!("Data cached successfully");
        }
    }

    fn write_entry(
        &self,
        source: &str,
        dataset: &SdkDataset,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct CacheEntryRef<'a> {
            data: &'a SdkDataset,
            timestamp: DateTime<Utc>,
            version: &'a str,
            source: &'a str,
        }

        let entry = CacheEntryRef {
            data: dataset,
            timestamp,
            version: CACHE_FORMAT_VERSION,
            source,
        };
        let json = serde_json::to_vec(&entry).context("Failed to serialize cache entry")?;

        // Written to a temp file, then renamed into place
        let path = self.entry_path();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write cache file: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to move cache file into place: {}", path.display()))?;
        Ok(())
    }

    /// Remove the cached entry, if any
    pub fn clear(&self) {
        let path = self.entry_path();
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!("Failed to remove cache file {}: {}", path.display(), e);
            }
        }
    }
}
