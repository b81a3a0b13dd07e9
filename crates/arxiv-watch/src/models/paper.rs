//! Listing entries and the records emitted for them.

use serde::{Deserialize, Serialize};

/// One listing on a result page, as found by the parser.
///
/// Never persisted. Both fields are optional because scraped markup is not
/// guaranteed to carry them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResultEntry {
    /// Detail-page href, exactly as found (may carry surrounding whitespace).
    pub link: Option<String>,

    /// Title text with inner whitespace collapsed.
    pub title: Option<String>,
}

impl RawResultEntry {
    /// Create an entry from its parts.
    #[must_use]
    pub fn new(link: Option<String>, title: Option<String>) -> Self {
        Self { link, title }
    }

    /// The trimmed detail link, if present.
    #[must_use]
    pub fn trimmed_link(&self) -> Option<&str> {
        self.link.as_deref().map(str::trim)
    }

    /// Canonical identifier: the last `/`-separated segment of the trimmed link.
    ///
    /// Returns `None` when there is no link. The segment itself may be empty
    /// (e.g. a link ending in `/`); callers decide what to do with that.
    #[must_use]
    pub fn canonical_id(&self) -> Option<&str> {
        self.trimmed_link().map(|link| link.rsplit('/').next().unwrap_or(link))
    }
}

/// A newly discovered paper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Canonical identifier, e.g. `2401.01234`.
    pub id: String,

    /// Paper title, if the listing had one.
    #[serde(default)]
    pub title: Option<String>,

    /// Absolute detail-page URL.
    pub url: String,
}

impl PaperRecord {
    /// Build a record from a listing entry whose id has already been extracted.
    #[must_use]
    pub fn from_entry(id: impl Into<String>, entry: &RawResultEntry) -> Self {
        Self {
            id: id.into(),
            title: entry.title.as_deref().map(str::trim).map(str::to_string),
            url: entry.trimmed_link().unwrap_or_default().to_string(),
        }
    }

    /// Get the title, falling back to "Untitled".
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}
