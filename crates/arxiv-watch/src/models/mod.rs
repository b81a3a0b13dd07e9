//! Data models for the watcher.
//!
//! `PaperRecord` and `SeenSet` are the only values that leave the process;
//! both serialize with serde.

mod paper;
mod search;
mod seen;

pub use paper::{PaperRecord, RawResultEntry};
pub use search::{SearchQuery, SearchTerm};
pub use seen::SeenSet;
