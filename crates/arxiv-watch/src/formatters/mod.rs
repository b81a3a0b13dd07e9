//! Output formatters for JSON lines and Markdown.
//!
//! Used by the binary to print a run; the library itself never writes output.

mod json;
mod markdown;

pub use self::json::*;
pub use markdown::*;
