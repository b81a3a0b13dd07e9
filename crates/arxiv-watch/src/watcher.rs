//! One complete watcher run.
//!
//! Order matters: configuration is validated first, then the store is locked
//! and loaded, and only then is the page fetched. A corrupt seen-set therefore
//! stops the run before any network traffic or output.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::{ArxivClient, PageFetcher};
use crate::config::Config;
use crate::discovery::{DiscoveryEngine, DiscoveryObserver, RunSummary, TracingObserver};
use crate::error::WatchResult;
use crate::models::{PaperRecord, SearchQuery, SearchTerm};
use crate::query::QueryBuilder;
use crate::store::{JsonFileStore, SeenStore};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Target that was fetched.
    pub query: SearchQuery,
    /// New records, in page order.
    pub records: Vec<PaperRecord>,
    /// Run counters.
    pub summary: RunSummary,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Whether the seen-set was saved.
    pub persisted: bool,
}

/// Query, fetch, discover and persist, once per call.
pub struct Watcher<F, S> {
    fetcher: F,
    store: S,
    builder: QueryBuilder,
    terms: Vec<SearchTerm>,
    observer: Arc<dyn DiscoveryObserver>,
    dry_run: bool,
}

impl Watcher<ArxivClient, JsonFileStore> {
    /// Watcher over the real arXiv endpoint with a file-backed seen-set.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client or the search URL is invalid.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fetcher = ArxivClient::new(config)?;
        let store = JsonFileStore::in_dir(&config.cache_dir);
        Ok(Self::new(config, fetcher, store)?)
    }
}

impl<F: PageFetcher, S: SeenStore> Watcher<F, S> {
    /// Assemble a watcher from its collaborators.
    ///
    /// # Errors
    ///
    /// Returns error if `config.search_url` is not a valid URL.
    pub fn new(config: &Config, fetcher: F, store: S) -> WatchResult<Self> {
        Ok(Self {
            fetcher,
            store,
            builder: QueryBuilder::new(&config.search_url)?,
            terms: config.search_terms.clone(),
            observer: Arc::new(TracingObserver),
            dry_run: false,
        })
    }

    /// Replace the event observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DiscoveryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetch and report without saving the seen-set.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Perform one run.
    ///
    /// # Errors
    ///
    /// Returns error on empty terms, a locked/corrupt/unwritable seen-set, or
    /// a failed fetch.
    pub async fn run_once(&self) -> WatchResult<RunReport> {
        let started_at = Utc::now();
        let query = self.builder.build(&self.terms)?;

        let _lock = self.store.lock()?;
        let mut engine = DiscoveryEngine::open(&self.store)?.with_observer(Arc::clone(&self.observer));

        tracing::info!(terms = self.terms.len(), target_url = %query, "Fetching search results");
        let page = self.fetcher.fetch(&query).await?;

        let mut run = engine.discover(&page);
        let records: Vec<_> = run.by_ref().collect();

        let summary = if self.dry_run {
            let mut summary = run.summary();
            drop(run);
            summary.total_seen = engine.seen().len();
            tracing::info!(emitted = summary.emitted, "Dry run, seen-set left untouched");
            summary
        } else {
            run.finish()?
        };

        Ok(RunReport { query, records, summary, started_at, persisted: !self.dry_run })
    }
}

impl<F, S> std::fmt::Debug for Watcher<F, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("terms", &self.terms)
            .field("base_url", &self.builder.base_url().as_str())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
