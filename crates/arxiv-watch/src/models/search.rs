//! Search terms and the query target built from them.

use std::fmt;

use url::Url;

/// A single non-empty, trimmed search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trim `raw`; returns `None` if nothing is left.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() { None } else { Some(Self(trimmed.to_string())) }
    }

    /// Parse a comma-delimited list, trimming each term and dropping blanks.
    ///
    /// Order is preserved; the first term anchors the query.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',').filter_map(Self::new).collect()
    }

    /// The term text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully encoded search request target.
///
/// Only produced by [`crate::query::QueryBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    url: Url,
}

impl SearchQuery {
    pub(crate) fn new(url: Url) -> Self {
        Self { url }
    }

    /// Target as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Target as a parsed URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_trims() {
        let term = SearchTerm::new("  graph neural networks \t").unwrap();
        assert_eq!(term.as_str(), "graph neural networks");
    }

    #[test]
    fn test_search_term_rejects_blank() {
        assert!(SearchTerm::new("").is_none());
        assert!(SearchTerm::new("   ").is_none());
    }

    #[test]
    fn test_parse_list_drops_blanks_and_keeps_order() {
        let terms = SearchTerm::parse_list(" fraud detection, ,anomaly detection,,  graph ");
        let texts: Vec<_> = terms.iter().map(SearchTerm::as_str).collect();
        assert_eq!(texts, vec!["fraud detection", "anomaly detection", "graph"]);
    }

    #[test]
    fn test_parse_list_all_blank() {
        assert!(SearchTerm::parse_list(" , ,").is_empty());
    }
}
