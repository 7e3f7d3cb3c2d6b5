//! Run messages and summary formatting.

use std::path::Path;

use bookfetch_core::{BookId, FetchOutcome, RunSummary};

pub(crate) fn fetching_line(count: usize, base_url: &str) -> String {
    format!("Fetching {count} books from {base_url}...")
}

pub(crate) fn found_line(found: usize) -> String {
    format!("Total books found: {found}")
}

/// Diagnostic for a failed book, `None` for successes.
pub(crate) fn failure_line(id: BookId, outcome: &FetchOutcome) -> Option<String> {
    match outcome {
        FetchOutcome::Downloaded { .. } | FetchOutcome::AlreadyPresent { .. } => None,
        FetchOutcome::Unavailable => Some(format!(
            "Error book {id}: not available in any supported format"
        )),
        FetchOutcome::Failed { error } => Some(format!("Error book {id}: {error}")),
    }
}

fn display_dir(dir: &Path) -> String {
    let shown = dir.display().to_string();
    if shown.ends_with(std::path::MAIN_SEPARATOR) {
        shown
    } else {
        format!("{shown}{}", std::path::MAIN_SEPARATOR)
    }
}

/// Text block printed at the end of a run.
pub(crate) fn format_summary(summary: &RunSummary) -> String {
    let mut lines = vec![
        "----- SUMMARY -----".to_string(),
        format!("Succeeded: {}", summary.succeeded),
    ];
    if summary.already_present > 0 {
        lines.push(format!("Already present: {}", summary.already_present));
    }
    lines.push(format!("Failed: {}", summary.failed));
    lines.push(format!("Saved in: {}", display_dir(&summary.output_dir)));
    lines.push(format!("Total time: {:.2} seconds", summary.elapsed_secs));
    lines.join("\n")
}

pub(crate) fn format_summary_json(summary: &RunSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
