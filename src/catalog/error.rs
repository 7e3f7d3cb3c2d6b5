//! Error types for the catalog module.

use thiserror::Error;

use crate::download::DownloadError;

/// Errors that prevent the top-books listing from producing identifiers.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The listing page could not be fetched.
    #[error("failed to fetch top-books listing: {0}")]
    Request(#[from] DownloadError),

    /// A CSS selector failed to compile.
    #[error("invalid CSS selector `{selector}`: {message}")]
    Selector {
        /// The selector source text.
        selector: &'static str,
        /// Parser message.
        message: String,
    },
}
