//! Discovery engine: page content in, never-before-seen records out.
//!
//! A run walks the page lazily. Each id is checked against the seen-set and the
//! ids already staged by this run, then staged, so a repeat later on the same
//! page is skipped just like an id from an earlier run. Nothing reaches the store
//! until [`DiscoveryRun::finish`], which saves the whole set once. Dropping a
//! run without finishing it persists nothing.

mod events;

use std::sync::Arc;

use serde::Serialize;

pub use events::{
    CollectingObserver, DiscoveryEvent, DiscoveryObserver, SkipReason, TracingObserver,
};

use crate::error::StateResult;
use crate::listing::{HtmlListingParser, ListingParser};
use crate::models::{PaperRecord, RawResultEntry, SeenSet};
use crate::store::SeenStore;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Listing entries found on the page.
    pub entries: usize,
    /// Records emitted.
    pub emitted: usize,
    /// Entries skipped because their id was already seen.
    pub skipped_seen: usize,
    /// Entries skipped because they had no usable link.
    pub skipped_malformed: usize,
    /// Entries never pulled from the run before it finished.
    pub unprocessed: usize,
    /// Size of the seen-set after the run was saved.
    pub total_seen: usize,
}

/// Owns the seen-set for the duration of one or more runs.
pub struct DiscoveryEngine<S> {
    store: S,
    seen: SeenSet,
    parser: Box<dyn ListingParser>,
    observer: Arc<dyn DiscoveryObserver>,
}

impl<S: SeenStore> DiscoveryEngine<S> {
    /// Load the seen-set from `store`.
    ///
    /// # Errors
    ///
    /// Fails if the store cannot be read or its contents are corrupt. An
    /// empty (never saved) store is not an error.
    pub fn open(store: S) -> StateResult<Self> {
        let seen = store.load()?;
        tracing::info!(ids = seen.len(), "Loaded seen-set");

        Ok(Self {
            store,
            seen,
            parser: Box::new(HtmlListingParser::new()),
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the listing parser.
    #[must_use]
    pub fn with_parser(mut self, parser: impl ListingParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Replace the event observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DiscoveryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Ids known as of the last finished run.
    #[must_use]
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a run over `page`.
    ///
    /// The returned iterator yields new records in page order.
    pub fn discover(&mut self, page: &str) -> DiscoveryRun<'_, S> {
        let entries = self.parser.parse(page);
        let summary = RunSummary { entries: entries.len(), ..RunSummary::default() };

        DiscoveryRun {
            staged: SeenSet::new(),
            entries: entries.into_iter(),
            summary,
            engine: self,
        }
    }

    /// Run over `page`, collect every new record and persist.
    ///
    /// # Errors
    ///
    /// Fails if the updated seen-set cannot be saved.
    pub fn discover_all(&mut self, page: &str) -> StateResult<(Vec<PaperRecord>, RunSummary)> {
        let mut run = self.discover(page);
        let records: Vec<_> = run.by_ref().collect();
        let summary = run.finish()?;
        Ok((records, summary))
    }
}

impl<S> std::fmt::Debug for DiscoveryEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryEngine").field("seen", &self.seen.len()).finish()
    }
}

/// One pass over a result page. Yields [`PaperRecord`]s.
pub struct DiscoveryRun<'a, S> {
    engine: &'a mut DiscoveryEngine<S>,
    entries: std::vec::IntoIter<RawResultEntry>,
    staged: SeenSet,
    summary: RunSummary,
}

impl<S: SeenStore> DiscoveryRun<'_, S> {
    /// Counters so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Save the seen-set with every id emitted by this run.
    ///
    /// Entries not yet pulled from the iterator are left alone and will be
    /// found again next time.
    ///
    /// # Errors
    ///
    /// Fails if the store rejects the write; the engine then keeps its
    /// previous seen-set.
    pub fn finish(self) -> StateResult<RunSummary> {
        let Self { engine, entries, staged, mut summary } = self;

        summary.unprocessed = entries.len();
        let mut merged = engine.seen.clone();
        merged.merge(staged);
        engine.store.save(&merged)?;
        summary.total_seen = merged.len();
        engine.seen = merged;

        tracing::info!(
            emitted = summary.emitted,
            skipped_seen = summary.skipped_seen,
            skipped_malformed = summary.skipped_malformed,
            total_seen = summary.total_seen,
            "Discovery run finished"
        );
        Ok(summary)
    }

    fn skip(&mut self, id: Option<&str>, reason: SkipReason) {
        if reason.is_malformed() {
            self.summary.skipped_malformed += 1;
        } else {
            self.summary.skipped_seen += 1;
        }
        self.engine
            .observer
            .on_event(&DiscoveryEvent::Skipped { id: id.map(str::to_string), reason });
    }
}

impl<S: SeenStore> Iterator for DiscoveryRun<'_, S> {
    type Item = PaperRecord;

    fn next(&mut self) -> Option<PaperRecord> {
        while let Some(entry) = self.entries.next() {
            let Some(id) = entry.canonical_id() else {
                self.skip(None, SkipReason::MissingLink);
                continue;
            };
            if id.is_empty() {
                self.skip(None, SkipReason::EmptyId);
                continue;
            }
            if self.engine.seen.contains(id) || !self.staged.insert(id) {
                let id = id.to_string();
                self.skip(Some(&id), SkipReason::AlreadySeen);
                continue;
            }

            let record = PaperRecord::from_entry(id, &entry);
            self.summary.emitted += 1;
            self.engine.observer.on_event(&DiscoveryEvent::Found { id: record.id.clone() });
            return Some(record);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entries.len()))
    }
}
