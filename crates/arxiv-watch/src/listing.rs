//! Result-page parsing.
//!
//! The discovery engine only needs three structural queries: every listing
//! container, the detail link inside one, and its title text. [`ListingParser`]
//! is that seam; [`HtmlListingParser`] answers it for arXiv search markup.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::RawResultEntry;

/// Listing container on an arXiv search result page.
const RESULT_SELECTOR: &str = "li.arxiv-result";

/// Anchor carrying the detail link, inside a container.
const LINK_SELECTOR: &str = "p.list-title a";

/// Title paragraph, inside a container.
const TITLE_SELECTOR: &str = "p.title";

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(RESULT_SELECTOR).expect("valid result selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(LINK_SELECTOR).expect("valid link selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(TITLE_SELECTOR).expect("valid title selector"));

/// Turns raw page content into listing entries, in page order.
pub trait ListingParser: Send + Sync {
    /// Parse `page`. Never fails: unrecognised markup yields fewer entries.
    fn parse(&self, page: &str) -> Vec<RawResultEntry>;
}

/// [`ListingParser`] for arXiv advanced-search HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlListingParser;

impl HtmlListingParser {
    /// Create a parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn entry(container: ElementRef<'_>) -> RawResultEntry {
        // First anchor that actually carries an href.
        let link = container
            .select(&LINK)
            .find_map(|a| a.value().attr("href"))
            .map(str::to_string);

        let title = container
            .select(&TITLE)
            .next()
            .map(|p| collapse_whitespace(p.text()))
            .filter(|t| !t.is_empty());

        RawResultEntry { link, title }
    }
}

impl ListingParser for HtmlListingParser {
    fn parse(&self, page: &str) -> Vec<RawResultEntry> {
        let document = Html::parse_document(page);
        let entries: Vec<_> = document.select(&RESULT).map(Self::entry).collect();
        tracing::debug!(entries = entries.len(), "Parsed result page");
        entries
    }
}

/// Join text nodes and collapse runs of whitespace into single spaces.
///
/// Titles are split across highlight spans and wrapped over several lines in
/// the markup.
fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(href: Option<&str>, title: &str) -> String {
        let anchor = href.map_or_else(String::new, |h| format!(r#"<a href="{h}">arXiv</a>"#));
        format!(
            r#"<li class="arxiv-result">
                 <div class="is-marginless"><p class="list-title is-inline-block">{anchor}</p></div>
                 <p class="title is-5 mathjax">{title}</p>
               </li>"#
        )
    }

    fn page(items: &[String]) -> String {
        format!(r#"<html><body><ol class="breathe-horizontal">{}</ol></body></html>"#, items.join(""))
    }

    #[test]
    fn test_parses_link_and_title() {
        let html = page(&[listing(Some("https://arxiv.org/abs/2401.00001"), "  A Title  ")]);
        let entries = HtmlListingParser::new().parse(&html);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link.as_deref(), Some("https://arxiv.org/abs/2401.00001"));
        assert_eq!(entries[0].title.as_deref(), Some("A Title"));
    }

    #[test]
    fn test_title_with_highlight_spans() {
        let title = "\n  <span class=\"search-hit\">Fraud</span>\n  <span class=\"search-hit\">Detection</span> in   Graphs\n";
        let html = page(&[listing(Some("https://arxiv.org/abs/2401.00002"), title)]);
        let entries = HtmlListingParser::new().parse(&html);

        assert_eq!(entries[0].title.as_deref(), Some("Fraud Detection in Graphs"));
    }

    #[test]
    fn test_missing_link_still_yields_entry() {
        let html = page(&[listing(None, "No link here")]);
        let entries = HtmlListingParser::new().parse(&html);

        assert_eq!(entries.len(), 1);
        assert!(entries[0].link.is_none());
    }

    #[test]
    fn test_blank_title_is_none() {
        let html = page(&[listing(Some("https://arxiv.org/abs/1"), "   ")]);
        let entries = HtmlListingParser::new().parse(&html);
        assert!(entries[0].title.is_none());
    }

    #[test]
    fn test_page_without_results() {
        let entries = HtmlListingParser::new().parse("<html><body><p>Sorry, no results</p></body></html>");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let html = page(&[
            listing(Some("https://arxiv.org/abs/A"), "a"),
            listing(Some("https://arxiv.org/abs/B"), "b"),
            listing(Some("https://arxiv.org/abs/C"), "c"),
        ]);
        let ids: Vec<_> = HtmlListingParser::new()
            .parse(&html)
            .iter()
            .filter_map(|e| e.canonical_id().map(str::to_string))
            .collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }
}
