//! Download engine running book fetches on a bounded worker pool.
//!
//! This module provides the `DownloadEngine` which coordinates concurrent
//! fetches using a semaphore-based concurrency control pattern and tallies
//! the results as they complete.
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
//! let engine = DownloadEngine::new(10)?;
//! let ids = vec![BookId::new(84), BookId::new(1342)];
//! let stats = engine
//!     .process(fetcher, ids, |result| println!("{} done", result.id))
//!     .await?;
//! println!("Succeeded: {}, Failed: {}", stats.succeeded(), stats.failed());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::constants::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use super::fetcher::{BookFetch, DownloadResult, FetchOutcome};
use crate::catalog::BookId;

/// Default worker count if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Tally of a download run.
///
/// Uses atomic counters so every worker can record its result as it
/// completes, in completion order.
#[derive(Debug, Default)]
pub struct DownloadStats {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    already_present: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Books downloaded or already on disk.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    /// Books unavailable or failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Successes that were idempotent skips.
    #[must_use]
    pub fn already_present(&self) -> usize {
        self.already_present.load(Ordering::SeqCst)
    }

    /// Books processed (succeeded + failed).
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded() + self.failed()
    }

    fn record(&self, outcome: &FetchOutcome) {
        if outcome.is_success() {
            self.succeeded.fetch_add(1, Ordering::SeqCst);
            if matches!(outcome, FetchOutcome::AlreadyPresent { .. }) {
                self.already_present.fetch_add(1, Ordering::SeqCst);
            }
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            succeeded: AtomicUsize::new(self.succeeded()),
            failed: AtomicUsize::new(self.failed()),
            already_present: AtomicUsize::new(self.already_present()),
        }
    }
}

/// Download engine running fetches on a fixed-size pool.
///
/// # Concurrency Model
///
/// - Each book runs in its own Tokio task
/// - A semaphore permit is acquired before starting each book
/// - Permits are released automatically when the fetch completes (RAII)
/// - Every spawned task is awaited before [`process`](Self::process) returns
///
/// One book failing, timing out or panicking only affects that book's tally.
#[derive(Debug)]
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
}

impl DownloadEngine {
    /// Creates a new engine with the given number of workers.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use bookfetch_core::DownloadEngine;
    ///
    /// let engine = DownloadEngine::new(10).unwrap();
    /// assert_eq!(engine.concurrency(), 10);
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(concurrency, "creating download engine");

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetches every book in `ids` and returns the tally.
    ///
    /// `on_result` is called from the worker once per book, in completion
    /// order, before the book is counted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    ///
    /// Note: individual book failures do NOT cause this method to error.
    #[instrument(skip(self, fetcher, ids, on_result), fields(books = ids.len()))]
    pub async fn process<F, C>(
        &self,
        fetcher: Arc<F>,
        ids: Vec<BookId>,
        on_result: C,
    ) -> Result<DownloadStats, EngineError>
    where
        F: BookFetch + ?Sized + 'static,
        C: Fn(&DownloadResult) + Send + Sync + 'static,
    {
        let stats = Arc::new(DownloadStats::new());
        let on_result = Arc::new(on_result);
        let mut handles = Vec::with_capacity(ids.len());

        info!("starting downloads");

        for id in ids {
            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let fetcher = Arc::clone(&fetcher);
            let stats = Arc::clone(&stats);
            let on_result = Arc::clone(&on_result);

            handles.push((
                id,
                tokio::spawn(async move {
                    // Permit is dropped when this block exits (RAII)
                    let _permit = permit;

                    let outcome = fetcher.fetch(id).await;
                    let result = DownloadResult { id, outcome };
                    (*on_result)(&result);
                    stats.record(&result.outcome);
                }),
            ));
        }

        debug!(task_count = handles.len(), "waiting for downloads to complete");

        for (id, handle) in handles {
            // A panicking fetch counts as a failure for that book only
            if let Err(e) = handle.await {
                warn!(book_id = %id, error = %e, "download task panicked");
                stats.increment_failed();
            }
        }

        let stats = stats.snapshot();
        info!(
            succeeded = stats.succeeded(),
            failed = stats.failed(),
            already_present = stats.already_present(),
            "downloads complete"
        );
        Ok(stats)
    }
}
