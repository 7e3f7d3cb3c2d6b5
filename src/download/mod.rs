//! Book downloading: HTTP access, single-book fetch and the worker pool.
//!
//! # Features
//!
//! - Shared [`HttpClient`] with the browser User-Agent and per-request timeouts
//! - [`BookFetcher`] resolving a format, skipping existing files and
//!   normalizing plain text before writing
//! - [`DownloadEngine`] running fetches on a bounded pool and tallying results
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bookfetch_core::{BookFetcher, BookId, DownloadEngine, FetchConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FetchConfig::default();
//! let fetcher = Arc::new(BookFetcher::from_config(&config)?);
//! let engine = DownloadEngine::new(config.concurrency)?;
//! let stats = engine
//!     .process(fetcher, vec![BookId::new(1342), BookId::new(84)], |_| {})
//!     .await?;
//! println!("Succeeded: {}, Failed: {}", stats.succeeded(), stats.failed());
//! # Ok(())
//! # }
//! ```

mod client;
pub(crate) mod constants;
mod engine;
mod error;
mod fetcher;

pub use client::HttpClient;
pub use engine::{DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, EngineError};
pub use error::DownloadError;
pub use fetcher::{BookFetch, BookFetcher, DownloadResult, FetchOutcome, book_file_path};

// Note: we do NOT define module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
