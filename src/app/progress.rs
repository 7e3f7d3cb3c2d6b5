//! Progress bar over completed books.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str =
    "{msg} {wide_bar} | {pos}/{len} books | {per_sec} | ETA {eta}";

/// Creates the bar for `total` books, or a hidden one when `visible` is false.
///
/// A hidden bar still counts, so callers never need to branch on it.
pub(crate) fn book_progress_bar(visible: bool, total: usize) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Downloading books");
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Prints a diagnostic line without tearing the bar.
pub(crate) fn print_diagnostic(bar: &ProgressBar, line: &str) {
    bar.suspend(|| eprintln!("{line}"));
}
