use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::sdk::{ClassDetails, SdkDataset, SdkLoader};
use crate::search::{ClassFilter, SearchEngine, SearchIndex};

/// A dataset together with everything derived from it. Built in full before
/// it becomes visible and never modified afterwards.
#[derive(Debug)]
pub struct SdkSnapshot {
    dataset: SdkDataset,
    index: Arc<SearchIndex>,
    class_filter: ClassFilter,
    loaded_at: DateTime<Utc>,
}

impl SdkSnapshot {
    pub fn new(dataset: SdkDataset) -> Self {
        let index = SearchIndex::build(&dataset);
        let class_filter = ClassFilter::new(&index);
        Self {
            dataset,
            index: Arc::new(index),
            class_filter,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(SdkDataset::new())
    }

    pub fn dataset(&self) -> &SdkDataset {
        &self.dataset
    }

    pub fn index(&self) -> &Arc<SearchIndex> {
        &self.index
    }

    pub fn class_filter(&self) -> &ClassFilter {
        &self.class_filter
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn class_details(&self, name: &str) -> Option<ClassDetails> {
        self.dataset.get(name).map(ClassDetails::from_record)
    }
}

/// Shared browser state: the loader and the current snapshot.
///
/// Readers clone the inner `Arc` and work on it without holding the lock; a
/// reload builds the next snapshot first and then replaces it in one
/// assignment.
#[derive(Debug, Clone)]
pub struct SdkBrowser {
    loader: Option<Arc<SdkLoader>>,
    snapshot: Arc<RwLock<Arc<SdkSnapshot>>>,
    engine: SearchEngine,
}

impl SdkBrowser {
    /// Load the initial dataset through `loader`
    pub async fn load(loader: SdkLoader) -> Result<Self> {
        let dataset = loader.load().await?;
        Ok(Self {
            loader: Some(Arc::new(loader)),
            snapshot: Arc::new(RwLock::new(Arc::new(SdkSnapshot::new(dataset)))),
            engine: SearchEngine::default(),
        })
    }

    /// A browser over a fixed dataset with nothing to reload from
    pub fn from_dataset(dataset: SdkDataset) -> Self {
        Self {
            loader: None,
            snapshot: Arc::new(RwLock::new(Arc::new(SdkSnapshot::new(dataset)))),
            engine: SearchEngine::default(),
        }
    }

    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    pub fn source(&self) -> Option<String> {
        self.loader.as_ref().map(|l| l.data_source().to_string())
    }

    pub async fn snapshot(&self) -> Arc<SdkSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Re-read the sources, bypassing the cache, and swap in the new snapshot.
    /// On failure the current snapshot stays in place.
    pub async fn reload(&self) -> Result<Arc<SdkSnapshot>> {
        let Some(loader) = &self.loader else {
            anyhow::bail!("No data source configured");
        };

        let dataset = loader.load_fresh().await?;
        let next = Arc::new(SdkSnapshot::new(dataset));
        *self.snapshot.write().await = Arc::clone(&next);

        tracing::info!(
            "Reloaded {} classes ({} members) from {}",
            next.dataset().len(),
            next.index().members().len(),
            loader.data_source()
        );
        Ok(next)
    }
}
