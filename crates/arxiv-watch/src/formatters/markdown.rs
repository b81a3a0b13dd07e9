//! Markdown output formatting.

use crate::models::PaperRecord;
use crate::watcher::RunReport;

/// Format a run as a Markdown digest.
#[must_use]
pub fn format_report_markdown(report: &RunReport) -> String {
    let mut output = format!(
        "# arXiv digest ({})\n\n",
        report.started_at.format("%Y-%m-%d %H:%M UTC")
    );

    output.push_str(&format!(
        "**New**: {} | **Already seen**: {} | **Skipped**: {}\n\n",
        report.summary.emitted, report.summary.skipped_seen, report.summary.skipped_malformed
    ));

    if !report.persisted {
        output.push_str("_Dry run: seen-set not updated._\n\n");
    }

    output.push_str(&format_records_markdown(&report.records));
    output
}

/// Format a list of records as Markdown.
#[must_use]
pub fn format_records_markdown(records: &[PaperRecord]) -> String {
    if records.is_empty() {
        return "No new papers.\n".to_string();
    }

    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        output.push_str(&format_record_markdown(record, i + 1));
    }
    output
}

/// Format a single record as a numbered Markdown list item.
#[must_use]
pub fn format_record_markdown(record: &PaperRecord, index: usize) -> String {
    format!(
        "{}. [{}]({}) `{}`\n",
        index,
        escape_link_text(record.title_or_default()),
        record.url,
        record.id
    )
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}
