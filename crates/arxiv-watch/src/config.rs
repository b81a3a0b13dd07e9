//! Configuration for the arXiv watcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::SearchTerm;

/// Search endpoint constants.
pub mod search {
    use std::time::Duration;

    /// arXiv advanced search endpoint.
    pub const BASE_URL: &str = "https://arxiv.org/search/advanced";

    /// Terms used when none are configured.
    pub const DEFAULT_TERMS: &str = "fraud detection";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// User-Agent sent with every request.
    pub const USER_AGENT: &str = concat!("arxiv-watch/", env!("CARGO_PKG_VERSION"));
}

/// Fixed query parameters, in the order they are encoded.
pub mod params {
    /// Parameters sent before the per-term triples.
    pub const FIXED: &[(&str, &str)] = &[
        ("advanced", ""),
        ("classification-computer_science", "y"),
        ("classification-physics_archives", "all"),
        ("classification-include_cross_list", "include"),
        ("date-filter_by", "all_dates"),
        ("abstracts", "show"),
        ("size", "200"),
        ("order", "-submitted_date"),
    ];

    /// Field every term is matched against.
    pub const TERM_FIELD: &str = "all";

    /// Operator joining the first term.
    pub const FIRST_OPERATOR: &str = "AND";

    /// Operator joining every later term.
    pub const NEXT_OPERATOR: &str = "OR";
}

/// Persisted state locations.
pub mod state {
    /// Default cache directory, relative to the working directory.
    pub const CACHE_DIR: &str = ".cache";

    /// Seen-set file name inside the cache directory.
    pub const SEEN_FILE: &str = "seen.json";
}

/// Environment variable names.
pub mod env {
    /// Comma-delimited search terms.
    pub const SEARCH_TERMS: &str = "SEARCH_TERMS";

    /// Cache directory override.
    pub const CACHE_DIR: &str = "ARXIV_WATCH_CACHE_DIR";

    /// Search endpoint override.
    pub const SEARCH_URL: &str = "ARXIV_WATCH_SEARCH_URL";
}

/// Watcher configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered search terms. May be empty; the query builder rejects that.
    pub search_terms: Vec<SearchTerm>,

    /// Search endpoint (for testing with mock servers).
    pub search_url: String,

    /// Directory holding the seen-set file.
    pub cache_dir: PathBuf,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// User-Agent header value.
    pub user_agent: String,
}

impl Config {
    /// Create a configuration for the given terms with default endpoint and cache.
    #[must_use]
    pub fn new(search_terms: Vec<SearchTerm>) -> Self {
        Self {
            search_terms,
            search_url: search::BASE_URL.to_string(),
            cache_dir: PathBuf::from(state::CACHE_DIR),
            request_timeout: search::REQUEST_TIMEOUT,
            connect_timeout: search::CONNECT_TIMEOUT,
            user_agent: search::USER_AGENT.to_string(),
        }
    }

    /// Create a test configuration pointing at a mock server and a scratch cache.
    #[must_use]
    pub fn for_testing(base_url: &str, cache_dir: impl AsRef<Path>) -> Self {
        Self {
            search_terms: SearchTerm::parse_list(search::DEFAULT_TERMS),
            search_url: format!("{}/search/advanced", base_url.trim_end_matches('/')),
            cache_dir: cache_dir.as_ref().to_path_buf(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            user_agent: search::USER_AGENT.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so new variables can validate.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Resolve configuration from an arbitrary key lookup.
    ///
    /// An unset `SEARCH_TERMS` falls back to [`search::DEFAULT_TERMS`]. A set
    /// but blank value yields no terms, which the query builder rejects.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_terms =
            lookup(env::SEARCH_TERMS).unwrap_or_else(|| search::DEFAULT_TERMS.to_string());
        let mut config = Self::new(SearchTerm::parse_list(&raw_terms));

        if let Some(dir) = lookup(env::CACHE_DIR).filter(|d| !d.trim().is_empty()) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(env::SEARCH_URL).filter(|u| !u.trim().is_empty()) {
            config.search_url = url;
        }

        config
    }

    /// Full path of the seen-set file.
    #[must_use]
    pub fn seen_path(&self) -> PathBuf {
        self.cache_dir.join(state::SEEN_FILE)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SearchTerm::parse_list(search::DEFAULT_TERMS))
    }
}
