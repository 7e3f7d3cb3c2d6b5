//! Top-books listing scraper.
//!
//! The catalog publishes its most downloaded books as ordered lists
//! (last 30 days first, then all time). Each list item links to
//! `/ebooks/{id}`; the numeric segment becomes a [`BookId`].
//!
//! # Example
//!
//! ```no_run
//! use bookfetch_core::{CatalogLister, FetchConfig, HttpClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let lister = CatalogLister::from_config(HttpClient::new(), &FetchConfig::default());
//! let ids = lister.list_top_books(25).await?;
//! println!("{} books", ids.len());
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::CatalogError;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::FetchConfig;
use crate::download::HttpClient;

/// Path of the top-books listing below the catalog root.
pub const TOP_BOOKS_PATH: &str = "/browse/scores/top";

const LIST_SELECTOR: &str = "ol";
const LINK_SELECTOR: &str = "a";

/// Numeric identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BookId(u64);

impl BookId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u64> for BookId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Extracts a [`BookId`] from a listing link target.
///
/// The identifier is the third `/`-separated segment, so `/ebooks/1342`
/// yields `1342`. Anything else (absolute URLs, short paths, non-numeric
/// segments) yields `None`.
#[must_use]
pub fn parse_book_id(href: &str) -> Option<BookId> {
    href.split('/').nth(2)?.parse().ok()
}

/// Extracts up to `count` identifiers from a listing page.
///
/// Ordered lists are visited in document order, and links inside each list
/// in document order. Malformed links are skipped. Collection stops as soon
/// as `count` identifiers are found.
///
/// # Errors
///
/// Returns [`CatalogError::Selector`] if a built-in selector fails to parse.
pub fn extract_book_ids(html: &str, count: usize) -> Result<Vec<BookId>, CatalogError> {
    let lists = compile(LIST_SELECTOR)?;
    let links = compile(LINK_SELECTOR)?;
    let document = Html::parse_document(html);

    let ids = document
        .select(&lists)
        .flat_map(|list| list.select(&links))
        .filter_map(|link| link.value().attr("href"))
        .filter_map(parse_book_id)
        .take(count)
        .collect();

    Ok(ids)
}

fn compile(selector: &'static str) -> Result<Selector, CatalogError> {
    Selector::parse(selector).map_err(|e| CatalogError::Selector {
        selector,
        message: e.to_string(),
    })
}

/// Fetches the top-books listing and turns it into identifiers.
#[derive(Debug, Clone)]
pub struct CatalogLister {
    client: HttpClient,
    listing_url: String,
    timeout: Duration,
}

impl CatalogLister {
    /// Creates a lister for the catalog rooted at `base_url`.
    #[must_use]
    pub fn new(client: HttpClient, base_url: &str, timeout: Duration) -> Self {
        let listing_url = format!("{}{TOP_BOOKS_PATH}", base_url.trim_end_matches('/'));
        Self {
            client,
            listing_url,
            timeout,
        }
    }

    /// Creates a lister from the run configuration.
    #[must_use]
    pub fn from_config(client: HttpClient, config: &FetchConfig) -> Self {
        Self::new(client, &config.base_url, config.catalog_timeout)
    }

    /// Full URL of the listing page.
    #[must_use]
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// Returns the first `count` book identifiers in listing order.
    ///
    /// Fewer are returned when the page has fewer valid links; that is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Request`] when the listing page cannot be
    /// fetched. No partial result is produced in that case.
    #[instrument(skip(self), fields(url = %self.listing_url))]
    pub async fn list_top_books(&self, count: usize) -> Result<Vec<BookId>, CatalogError> {
        let html = self.client.get_text(&self.listing_url, self.timeout).await?;
        debug!(bytes = html.len(), "fetched top-books listing");
        let ids = extract_book_ids(&html, count)?;

        info!(requested = count, found = ids.len(), "parsed top-books listing");
        Ok(ids)
    }
}
