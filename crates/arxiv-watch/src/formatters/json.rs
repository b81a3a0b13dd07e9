//! JSON output formatting.

use serde_json::{Value, json};

use crate::models::PaperRecord;
use crate::watcher::RunReport;

/// One JSON object per line, one line per record.
///
/// Empty input yields an empty string.
pub fn format_records_json_lines(records: &[PaperRecord]) -> serde_json::Result<String> {
    let mut output = String::new();
    for record in records {
        output.push_str(&serde_json::to_string(record)?);
        output.push('\n');
    }
    Ok(output)
}

/// Run metadata as a single JSON value, records excluded.
#[must_use]
pub fn run_summary_json(report: &RunReport) -> Value {
    json!({
        "query": report.query.as_str(),
        "startedAt": report.started_at.to_rfc3339(),
        "persisted": report.persisted,
        "summary": report.summary,
    })
}
