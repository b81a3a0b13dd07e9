//! Query builder: search terms to a single advanced-search target.
//!
//! Encoding is positional. Term `i` contributes `terms-{i}-operator`,
//! `terms-{i}-term` and `terms-{i}-field`; the first operator is `AND`, the
//! rest are `OR`. Fixed parameters come first, in [`params::FIXED`] order, so
//! the same terms always produce the same bytes.

use url::Url;

use crate::config::{params, search};
use crate::error::ConfigError;
use crate::models::{SearchQuery, SearchTerm};

/// Builds [`SearchQuery`] targets against one endpoint.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: Url,
}

impl QueryBuilder {
    /// Create a builder for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut base = Url::parse(base_url)
            .map_err(|source| ConfigError::InvalidUrl { url: base_url.to_string(), source })?;
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    /// The endpoint queries are built against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Encode `terms` into a search target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyTerms`] if `terms` is empty.
    pub fn build(&self, terms: &[SearchTerm]) -> Result<SearchQuery, ConfigError> {
        if terms.is_empty() {
            return Err(ConfigError::EmptyTerms);
        }

        let mut url = self.base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params::FIXED {
                pairs.append_pair(key, value);
            }

            for (i, term) in terms.iter().enumerate() {
                let operator = if i == 0 { params::FIRST_OPERATOR } else { params::NEXT_OPERATOR };
                pairs.append_pair(&format!("terms-{i}-operator"), operator);
                pairs.append_pair(&format!("terms-{i}-term"), term.as_str());
                pairs.append_pair(&format!("terms-{i}-field"), params::TERM_FIELD);
            }
        }

        tracing::debug!(terms = terms.len(), target = %url, "Built search query");
        Ok(SearchQuery::new(url))
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self { base: Url::parse(search::BASE_URL).expect("valid built-in search URL") }
    }
}
