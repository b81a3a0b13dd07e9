//! Fuzzing library for arxiv-watch.
//!
//! Targets cover the two places untrusted bytes enter the crate: the search
//! result page and the seen-set file.
//!
//! # Usage
//!
//! ```bash
//! cd crates/arxiv-watch-fuzz
//! cargo +nightly fuzz run fuzz_listing_parse -- -max_total_time=60
//! ```

pub use arxiv_watch::{listing, models};
