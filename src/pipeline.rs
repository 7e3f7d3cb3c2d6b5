//! End-to-end download run: listing, concurrent fetch, tally.
//!
//! [`Pipeline`] wires the catalog lister, the book fetcher and the download
//! engine from one [`FetchConfig`]. The binary drives it step by step so it
//! can print progress between phases; [`run_pipeline`] runs everything in
//! one call.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::catalog::{BookId, CatalogError, CatalogLister};
use crate::config::{ConfigError, FetchConfig};
use crate::download::{
    BookFetcher, DownloadEngine, DownloadResult, EngineError, HttpClient,
};
use crate::text::Normalizer;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The output folder could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// Folder that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The top-books listing could not be obtained.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The worker pool failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Final numbers of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Books dispatched to the pool.
    pub books: usize,
    /// Books downloaded or already present.
    pub succeeded: usize,
    /// Books unavailable or failed.
    pub failed: usize,
    /// Successes that were already on disk.
    pub already_present: usize,
    /// Folder holding the books.
    pub output_dir: PathBuf,
    /// Wall-clock time of the dispatch-through-completion phase, in seconds.
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Elapsed time as a [`Duration`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}

/// Creates the output folder if it does not exist yet.
///
/// # Errors
///
/// Returns [`PipelineError::OutputDir`] when the folder cannot be created.
pub fn prepare_output_dir(path: &Path) -> Result<(), PipelineError> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|source| PipelineError::OutputDir {
        path: path.to_path_buf(),
        source,
    })?;
    info!(dir = %path.display(), "created output directory");
    Ok(())
}

/// Components of one run, built from a [`FetchConfig`].
#[derive(Debug)]
pub struct Pipeline {
    config: FetchConfig,
    lister: CatalogLister,
    fetcher: Arc<BookFetcher>,
    engine: DownloadEngine,
}

impl Pipeline {
    /// Validates `config` and builds every component.
    ///
    /// The stopword set is built here, once per run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] for invalid settings and
    /// [`PipelineError::HttpClient`] if the client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self, PipelineError> {
        config.validate()?;

        let client =
            HttpClient::with_user_agent(&config.user_agent).map_err(PipelineError::HttpClient)?;
        let normalizer = Arc::new(Normalizer::english_spanish());
        let lister = CatalogLister::from_config(client.clone(), &config);
        let fetcher = Arc::new(BookFetcher::with_client(client, normalizer, &config));
        let engine = DownloadEngine::new(config.concurrency)?;

        Ok(Self {
            config,
            lister,
            fetcher,
            engine,
        })
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Lists up to `count` top books.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Catalog`] when the listing cannot be fetched.
    pub async fn list(&self, count: usize) -> Result<Vec<BookId>, PipelineError> {
        Ok(self.lister.list_top_books(count).await?)
    }

    /// Downloads `ids` on the worker pool and summarizes the run.
    ///
    /// Only this phase is timed.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Engine`] if the pool fails; individual book
    /// failures are counted, never returned.
    #[instrument(skip(self, ids, on_result), fields(books = ids.len()))]
    pub async fn download<C>(
        &self,
        ids: Vec<BookId>,
        on_result: C,
    ) -> Result<RunSummary, PipelineError>
    where
        C: Fn(&DownloadResult) + Send + Sync + 'static,
    {
        let books = ids.len();
        let start = Instant::now();
        let stats = self
            .engine
            .process(Arc::clone(&self.fetcher), ids, on_result)
            .await?;
        let elapsed = start.elapsed();

        Ok(RunSummary {
            books,
            succeeded: stats.succeeded(),
            failed: stats.failed(),
            already_present: stats.already_present(),
            output_dir: self.config.output_dir.clone(),
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }
}

/// Runs a whole download: output folder, listing, fetch, summary.
///
/// # Errors
///
/// Returns [`PipelineError`] for configuration, folder, listing and pool
/// failures. Per-book failures only show up in the summary.
pub async fn run_pipeline<C>(
    config: FetchConfig,
    count: usize,
    on_result: C,
) -> Result<RunSummary, PipelineError>
where
    C: Fn(&DownloadResult) + Send + Sync + 'static,
{
    let pipeline = Pipeline::new(config)?;
    prepare_output_dir(&pipeline.config().output_dir)?;
    let ids = pipeline.list(count).await?;
    pipeline.download(ids, on_result).await
}
