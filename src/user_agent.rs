//! User-Agent string sent with every catalog, probe and download request.
//!
//! The catalog rejects requests without a browser-like User-Agent, so the
//! tool does not identify itself the way generic HTTP clients do.

/// Browser User-Agent required by the catalog site.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";
