//! Input scheduling for interactive search surfaces.
//!
//! A [`Debouncer`] keeps at most one pending invocation: every new input
//! aborts the previous task, so the action runs once per quiet period. A
//! [`Generation`] counter lets a completion check that no newer input has
//! arrived before it publishes results.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::search::config::SEARCH_DEBOUNCE;
use crate::search::engine::{SearchEngine, SearchOutcome, SearchQuery};
use crate::search::index::SearchIndex;

/// Runs an action after `delay` has passed without another call.
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action`, replacing any invocation still waiting
    pub fn call<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Shared, monotonically increasing input counter
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, returning its number
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// Debounced advanced search publishing its latest outcome on a watch channel
#[derive(Debug)]
pub struct LiveSearch {
    engine: SearchEngine,
    index: Arc<SearchIndex>,
    debouncer: Debouncer,
    generation: Generation,
    results: Arc<watch::Sender<SearchOutcome>>,
}

impl LiveSearch {
    pub fn new(index: Arc<SearchIndex>) -> Self {
        Self::with_delay(index, SEARCH_DEBOUNCE)
    }

    pub fn with_delay(index: Arc<SearchIndex>, delay: Duration) -> Self {
        let (results, _) = watch::channel(SearchOutcome::default());
        Self {
            engine: SearchEngine::default(),
            index,
            debouncer: Debouncer::new(delay),
            generation: Generation::new(),
            results: Arc::new(results),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchOutcome> {
        self.results.subscribe()
    }

    /// Record new input. The search runs once the input has been quiet for
    /// the debounce delay, and is dropped if newer input arrived meanwhile.
    pub fn input(&mut self, query: SearchQuery) -> u64 {
        let generation = self.generation.next();
        let guard = self.generation.clone();
        let engine = self.engine;
        let index = Arc::clone(&self.index);
        let results = Arc::clone(&self.results);

        self.debouncer.call(async move {
            let outcome = engine.search(&index, &query);
            if guard.is_current(generation) {
                results.send_replace(outcome);
            } else {
                tracing::debug!("Discarding stale search generation {}", generation);
            }
        });
        generation
    }

    /// Replace the index; pending input is invalidated
    pub fn set_index(&mut self, index: Arc<SearchIndex>) {
        self.generation.next();
        self.debouncer.cancel();
        self.index = index;
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}
