//! Constants for the download module (timeouts, worker pool bounds).

/// HTTP connect timeout shared by every request (seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Timeout for a single format existence probe (seconds).
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Timeout for a full book download (seconds).
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 10;

/// Timeout for the top-books listing page (seconds).
pub const CATALOG_TIMEOUT_SECS: u64 = 30;

/// Minimum allowed worker count.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed worker count.
pub const MAX_CONCURRENCY: usize = 100;

/// Charset assumed for text bodies whose `Content-Type` names none.
pub const FALLBACK_TEXT_CHARSET: &str = "ISO-8859-1";
