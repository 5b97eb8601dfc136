//! Loading SDK dumps from disk or HTTP and normalizing them into an
//! [`SdkDataset`].
//!
//! Dumps come from several converter versions, so the raw layout is lenient:
//! the document may be a bare array of classes or an object with a `Classes`
//! (or `classes`) array, and every key may be upper or lower case.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::cache::DataCache;
use crate::sdk::types::{ClassRecord, GLOBALS_TYPE_TAG, MemberRecord, SdkDataset};
use crate::util::{LooseString, deserialize_size_from_anything, deserialize_string_from_anything};

/// Name of the virtual class built from the globals file
pub const GLOBALS_CLASS_NAME: &str = "Offsets and Globals";

/// Where a JSON document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkSource {
    Local(PathBuf),
    Remote(String),
}

impl SdkSource {
    /// Parse a CLI/env value: `http(s)://` URLs are remote, anything else is a
    /// local path with `~` expanded.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            bail!("Data source must not be empty");
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(SdkSource::Remote(value.to_string()));
        }
        let expanded = shellexpand::tilde(value);
        Ok(SdkSource::Local(PathBuf::from(expanded.as_ref())))
    }

    /// Read the raw bytes behind this source
    pub async fn read(&self) -> Result<Vec<u8>> {
        match self {
            SdkSource::Local(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            SdkSource::Remote(url) => {
                let response = reqwest::get(url)
                    .await
                    .with_context(|| format!("Failed to fetch {url}"))?;
                let status = response.status();
                if !status.is_success() {
                    bail!("HTTP error fetching {url}: status {status}");
                }
                let bytes = response
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to read response body from {url}"))?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Stable identity for cache keys: absolute paths for local files
    pub fn cache_id(&self) -> String {
        match self {
            SdkSource::Local(path) => std::path::absolute(path)
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string(),
            SdkSource::Remote(url) => url.clone(),
        }
    }

    /// Last modification time of a local file. Remote sources and files that
    /// cannot be read report `None`.
    pub async fn modified(&self) -> Option<DateTime<Utc>> {
        match self {
            SdkSource::Local(path) => {
                let metadata = tokio::fs::metadata(path).await.ok()?;
                metadata.modified().ok().map(DateTime::<Utc>::from)
            }
            SdkSource::Remote(_) => None,
        }
    }
}

impl fmt::Display for SdkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdkSource::Local(path) => write!(f, "{}", path.display()),
            SdkSource::Remote(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    List(Vec<Option<RawClass>>),
    Wrapped {
        #[serde(rename = "Classes", alias = "classes")]
        classes: Vec<Option<RawClass>>,
    },
    Unrecognized(serde::de::IgnoredAny),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawClass {
    #[serde(rename = "n", alias = "N", deserialize_with = "deserialize_string_from_anything")]
    name: String,
    #[serde(rename = "p", alias = "P", deserialize_with = "deserialize_string_from_anything")]
    parent: String,
    #[serde(rename = "s", alias = "S", deserialize_with = "deserialize_size_from_anything")]
    size: u64,
    #[serde(rename = "t", alias = "T", deserialize_with = "deserialize_string_from_anything")]
    type_tag: String,
    #[serde(rename = "m", alias = "M")]
    members: Option<Vec<Option<RawMember>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMember {
    #[serde(rename = "n", alias = "N", deserialize_with = "deserialize_string_from_anything")]
    name: String,
    #[serde(rename = "t", alias = "T", deserialize_with = "deserialize_string_from_anything")]
    type_name: String,
    #[serde(rename = "o", alias = "O", deserialize_with = "deserialize_string_from_anything")]
    offset: String,
    #[serde(rename = "s", alias = "S", deserialize_with = "deserialize_string_from_anything")]
    size: String,
}

impl From<RawMember> for MemberRecord {
    fn from(raw: RawMember) -> Self {
        MemberRecord {
            name: raw.name,
            type_name: raw.type_name,
            offset: raw.offset,
            size: raw.size,
        }
    }
}

/// Parse an SDK dump into class records, in document order.
///
/// Classes without a name are dropped. Null members become empty members so
/// the layout view still shows a row for them.
pub fn parse_sdk_json(bytes: &[u8]) -> Result<Vec<ClassRecord>> {
    let document: RawDocument =
        serde_json::from_slice(bytes).context("Failed to parse SDK data as JSON")?;

    let raw_classes = match document {
        RawDocument::List(classes) | RawDocument::Wrapped { classes } => classes,
        RawDocument::Unrecognized(_) => {
            tracing::warn!("SDK data has no class array; treating it as empty");
            Vec::new()
        }
    };

    let classes = raw_classes
        .into_iter()
        .flatten()
        .filter(|raw| !raw.name.is_empty())
        .map(|raw| ClassRecord {
            name: raw.name,
            parent: raw.parent,
            size: raw.size,
            type_tag: raw.type_tag,
            members: raw
                .members
                .unwrap_or_default()
                .into_iter()
                .map(|member| member.map(MemberRecord::from).unwrap_or_default())
                .collect(),
        })
        .collect();

    Ok(classes)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGlobals {
    bases: Option<IndexMap<String, LooseString>>,
    offsets: Option<IndexMap<String, Option<IndexMap<String, LooseString>>>>,
}

/// Parse a globals file (`{ bases: {...}, offsets: { scope: {...} } }`) into
/// the virtual globals class. Every base and every scoped offset becomes a
/// `hex` member.
pub fn parse_globals_json(bytes: &[u8]) -> Result<ClassRecord> {
    let raw: RawGlobals =
        serde_json::from_slice(bytes).context("Failed to parse globals as JSON")?;

    let mut class = ClassRecord::new(GLOBALS_CLASS_NAME).with_type_tag(GLOBALS_TYPE_TAG);

    for (key, value) in raw.bases.unwrap_or_default() {
        class
            .members
            .push(MemberRecord::new(key, "hex", String::from(value), ""));
    }
    for (_scope, group) in raw.offsets.unwrap_or_default() {
        for (key, value) in group.unwrap_or_default() {
            class
                .members
                .push(MemberRecord::new(key, "hex", String::from(value), ""));
        }
    }

    Ok(class)
}

/// Combine the optional globals class with the SDK classes. The globals class
/// always comes first.
pub fn assemble_dataset(globals: Option<ClassRecord>, classes: Vec<ClassRecord>) -> SdkDataset {
    globals.into_iter().chain(classes).collect()
}

/// Loads the dataset from its sources, going through the on-disk cache when
/// one is configured.
#[derive(Debug, Clone)]
pub struct SdkLoader {
    data: SdkSource,
    globals: Option<SdkSource>,
    cache: Option<DataCache>,
}

impl SdkLoader {
    pub fn new(data: SdkSource) -> Self {
        Self {
            data,
            globals: None,
            cache: None,
        }
    }

    pub fn with_globals(mut self, globals: Option<SdkSource>) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_cache(mut self, cache: Option<DataCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn data_source(&self) -> &SdkSource {
        &self.data
    }

    /// Key the cache entry is stored under: the data source plus the globals
    /// source, if any
    pub fn cache_key(&self) -> String {
        match &self.globals {
            Some(globals) => format!("{} + {}", self.data.cache_id(), globals.cache_id()),
            None => self.data.cache_id(),
        }
    }

    /// Load the dataset, preferring a fresh cache entry for the same sources.
    /// A local source edited after the entry was written makes it stale.
    pub async fn load(&self) -> Result<SdkDataset> {
        if let Some(cache) = &self.cache {
            if let Some(entry) = cache.load(&self.cache_key()) {
                if self.modified_since(entry.timestamp).await {
                    tracing::info!("Source changed since it was cached, reloading");
                } else {
                    tracing::info!("Loaded {} classes from cache", entry.data.len());
                    return Ok(entry.data);
                }
            }
        }
        self.load_fresh().await
    }

    async fn modified_since(&self, timestamp: DateTime<Utc>) -> bool {
        for source in std::iter::once(&self.data).chain(&self.globals) {
            if source.modified().await.is_some_and(|modified| modified > timestamp) {
                return true;
            }
        }
        false
    }

    /// Load straight from the sources, bypassing and then refreshing the cache
    pub async fn load_fresh(&self) -> Result<SdkDataset> {
        let globals = match &self.globals {
            Some(source) => self.load_globals(source).await,
            None => None,
        };

        let bytes = self.data.read().await?;
        let classes = parse_sdk_json(&bytes)
            .with_context(|| format!("Invalid SDK data in {}", self.data))?;
        tracing::info!("Loaded {} classes from {}", classes.len(), self.data);

        let dataset = assemble_dataset(globals, classes);

        if let Some(cache) = &self.cache {
            cache.save(&self.cache_key(), &dataset);
        }

        Ok(dataset)
    }

    /// Globals are optional: any failure is logged and the SDK loads without them
    async fn load_globals(&self, source: &SdkSource) -> Option<ClassRecord> {
        let result = async {
            let bytes = source.read().await?;
            parse_globals_json(&bytes)
        }
        .await;

        match result {
            Ok(class) => {
                tracing::info!("Loaded {} globals from {}", class.members.len(), source);
                Some(class)
            }
            Err(e) => {
                tracing::warn!("Failed to load globals from {}: {:#}", source, e);
                None
            }
        }
    }
}
