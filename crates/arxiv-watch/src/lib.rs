//! arXiv Watch
//!
//! Incremental discovery over the arXiv advanced search page. Each run builds
//! one query from the configured terms, reads the single result page, and
//! yields only papers whose ids have never been emitted before. Emitted ids are
//! remembered in a durable seen-set so repeated runs stay quiet until something
//! new appears.
//!
//! # Features
//!
//! - **Deterministic queries**: identical terms always produce the same target
//! - **Set-based dedup**: across runs and within a single page
//! - **All-or-nothing persistence**: the seen-set is saved once per run, atomically
//! - **Pluggable seams**: fetcher, listing parser, store and event observer are traits
//!
//! # Example
//!
//! ```no_run
//! use arxiv_watch::{Config, Watcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let watcher = Watcher::from_config(&config)?;
//!
//!     let report = watcher.run_once().await?;
//!     for record in &report.records {
//!         println!("{} {}", record.id, record.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod formatters;
pub mod listing;
pub mod models;
pub mod query;
pub mod store;
pub mod watcher;

pub use client::{ArxivClient, PageFetcher};
pub use config::Config;
pub use discovery::{DiscoveryEngine, DiscoveryEvent, DiscoveryObserver, RunSummary, SkipReason};
pub use error::{ClientError, ConfigError, StateError, WatchError};
pub use listing::{HtmlListingParser, ListingParser};
pub use models::{PaperRecord, SearchQuery, SearchTerm, SeenSet};
pub use query::QueryBuilder;
pub use store::{JsonFileStore, MemoryStore, SeenStore};
pub use watcher::{RunReport, Watcher};
