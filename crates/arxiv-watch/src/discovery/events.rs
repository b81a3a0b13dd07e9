//! Per-entry outcomes reported by the discovery engine.

use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Why a listing entry produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The entry had no detail link.
    MissingLink,
    /// The detail link had an empty last path segment.
    EmptyId,
    /// The id was emitted by an earlier run or earlier on this page.
    AlreadySeen,
}

impl SkipReason {
    /// Returns true for entries skipped because the markup was unusable.
    #[must_use]
    pub const fn is_malformed(self) -> bool {
        matches!(self, Self::MissingLink | Self::EmptyId)
    }

    /// Short stable label, used as a log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingLink => "missing_link",
            Self::EmptyId => "empty_id",
            Self::AlreadySeen => "already_seen",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A new record was emitted.
    Found {
        /// Canonical id of the record
        id: String,
    },
    /// The entry was skipped.
    Skipped {
        /// Canonical id, when one could be extracted
        id: Option<String>,
        /// Why the entry was skipped
        reason: SkipReason,
    },
}

/// Receives [`DiscoveryEvent`]s as the engine walks a page.
///
/// The host decides what to do with them; the engine itself does not log.
pub trait DiscoveryObserver: Send + Sync {
    /// Called once per listing entry, in page order.
    fn on_event(&self, event: &DiscoveryEvent);
}

/// Default observer: new papers at `info`, skips at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn on_event(&self, event: &DiscoveryEvent) {
        match event {
            DiscoveryEvent::Found { id } => tracing::info!(id = %id, "Found new paper"),
            DiscoveryEvent::Skipped { id, reason } => {
                tracing::debug!(id = ?id, reason = %reason, "Skipped listing entry");
            }
        }
    }
}

/// Observer that keeps every event, for inspection after a run.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<DiscoveryEvent>>,
}

impl CollectingObserver {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<DiscoveryEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Skip reasons seen so far, in order.
    #[must_use]
    pub fn skip_reasons(&self) -> Vec<SkipReason> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DiscoveryEvent::Skipped { reason, .. } => Some(reason),
                DiscoveryEvent::Found { .. } => None,
            })
            .collect()
    }
}

impl DiscoveryObserver for CollectingObserver {
    fn on_event(&self, event: &DiscoveryEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}
