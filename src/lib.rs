//! Bookfetch Core Library
//!
//! This library provides the core functionality for the bookfetch tool,
//! which downloads the most popular books of a public-domain catalog in
//! bulk, preferring plain text and cleaning it for text analysis.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Top-books listing scraper producing book identifiers
//! - [`resolver`] - Per-book format probing across URL templates
//! - [`download`] - HTTP client, single-book fetcher and concurrent engine
//! - [`text`] - Stopword removal for plain-text books
//! - [`pipeline`] - End-to-end run: listing, dispatch, tally
//! - [`config`] - Run configuration and defaults

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod download;
pub mod pipeline;
pub mod resolver;
pub mod text;
mod user_agent;

// Re-export commonly used types
pub use catalog::{BookId, CatalogError, CatalogLister};
pub use config::{ConfigError, FetchConfig};
pub use download::{
    BookFetch, BookFetcher, DEFAULT_CONCURRENCY, DownloadEngine, DownloadError, DownloadResult,
    DownloadStats, EngineError, FetchOutcome, HttpClient,
};
pub use pipeline::{Pipeline, PipelineError, RunSummary, prepare_output_dir, run_pipeline};
pub use resolver::{FileExtension, FormatCandidate, FormatResolver, ResolvedBook};
pub use text::Normalizer;
pub use user_agent::BROWSER_USER_AGENT;
