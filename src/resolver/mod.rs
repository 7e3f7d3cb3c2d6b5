//! Format resolution: find which file format a book is published in.
//!
//! Every book is probed against a fixed, priority-ordered list of URL
//! templates. Plain text comes first because it is the lightest to store and
//! the only format that gets normalized; binary formats follow.
//!
//! # Architecture
//!
//! - [`FormatCandidate`] - One URL template, in [`FormatCandidate::PRIORITY`] order
//! - [`FileExtension`] - Extension of the stored file for a candidate
//! - [`FormatResolver`] - Probe loop returning the first available candidate
//! - [`ResolvedBook`] - Winning URL and extension for one book
//!
//! # Example
//!
//! ```no_run
//! use bookfetch_core::{BookId, FetchConfig, FormatResolver, HttpClient};
//!
//! # async fn example() {
//! let resolver = FormatResolver::from_config(HttpClient::new(), &FetchConfig::default());
//! if let Some(resolved) = resolver.resolve(BookId::new(84)).await {
//!     println!("{} -> {}", resolved.id, resolved.url);
//! }
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::catalog::BookId;
use crate::config::FetchConfig;
use crate::download::HttpClient;

/// Extension of a stored book file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    /// Plain text, normalized before writing.
    Txt,
    /// PDF, written verbatim.
    Pdf,
    /// EPUB, written verbatim.
    Epub,
    /// HTML, written verbatim.
    Htm,
}

impl FileExtension {
    /// Extension without the leading dot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Pdf => "pdf",
            Self::Epub => "epub",
            Self::Htm => "htm",
        }
    }

    /// Whether content in this format goes through the normalizer.
    #[must_use]
    pub const fn is_plain_text(self) -> bool {
        matches!(self, Self::Txt)
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One URL template tried while resolving a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatCandidate {
    /// `{id}.txt`
    PlainText,
    /// `{id}-0.txt`, the UTF-8 plain text variant
    PlainTextUtf8,
    /// `{id}.pdf`
    Pdf,
    /// `{id}.epub`
    Epub,
    /// `{id}-h/{id}-h.htm`
    Html,
}

impl FormatCandidate {
    /// Probe order. The first available candidate wins.
    pub const PRIORITY: [Self; 5] = [
        Self::PlainText,
        Self::PlainTextUtf8,
        Self::Pdf,
        Self::Epub,
        Self::Html,
    ];

    /// Extension of the file stored for this candidate.
    #[must_use]
    pub const fn extension(self) -> FileExtension {
        match self {
            Self::PlainText | Self::PlainTextUtf8 => FileExtension::Txt,
            Self::Pdf => FileExtension::Pdf,
            Self::Epub => FileExtension::Epub,
            Self::Html => FileExtension::Htm,
        }
    }

    /// Path of this candidate below the book's files folder.
    #[must_use]
    pub fn file_path(self, id: BookId) -> String {
        match self {
            Self::PlainText => format!("{id}.txt"),
            Self::PlainTextUtf8 => format!("{id}-0.txt"),
            Self::Pdf => format!("{id}.pdf"),
            Self::Epub => format!("{id}.epub"),
            Self::Html => format!("{id}-h/{id}-h.htm"),
        }
    }
}

/// A book whose format has been found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBook {
    /// The book.
    pub id: BookId,
    /// URL that answered the probe.
    pub url: String,
    /// Template that matched.
    pub candidate: FormatCandidate,
}

impl ResolvedBook {
    /// Extension of the file to store.
    #[must_use]
    pub fn extension(&self) -> FileExtension {
        self.candidate.extension()
    }
}

/// Probes format candidates for a book.
#[derive(Debug, Clone)]
pub struct FormatResolver {
    client: HttpClient,
    base_url: String,
    probe_timeout: Duration,
}

impl FormatResolver {
    /// Creates a resolver for the catalog rooted at `base_url`.
    #[must_use]
    pub fn new(client: HttpClient, base_url: &str, probe_timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            probe_timeout,
        }
    }

    /// Creates a resolver from the run configuration.
    #[must_use]
    pub fn from_config(client: HttpClient, config: &FetchConfig) -> Self {
        Self::new(client, &config.base_url, config.probe_timeout)
    }

    /// Full URL of `candidate` for `id`.
    #[must_use]
    pub fn candidate_url(&self, id: BookId, candidate: FormatCandidate) -> String {
        format!("{}/files/{id}/{}", self.base_url, candidate.file_path(id))
    }

    /// Returns the first candidate that answers its probe with `200 OK`.
    ///
    /// Probe failures of any kind (timeout, connection error, other status)
    /// move on to the next candidate. `None` means the book is not available
    /// in any supported format.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn resolve(&self, id: BookId) -> Option<ResolvedBook> {
        for candidate in FormatCandidate::PRIORITY {
            let url = self.candidate_url(id, candidate);
            match self.client.probe(&url, self.probe_timeout).await {
                Ok(()) => {
                    debug!(url = %url, extension = %candidate.extension(), "format resolved");
                    return Some(ResolvedBook { id, url, candidate });
                }
                Err(error) => {
                    debug!(url = %url, error = %error, "format not available");
                }
            }
        }

        debug!("no format available");
        None
    }
}
