//! Single-book fetch: resolve, skip if present, download, write.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::client::HttpClient;
use super::error::DownloadError;
use crate::catalog::BookId;
use crate::config::FetchConfig;
use crate::resolver::{FileExtension, FormatResolver, ResolvedBook};
use crate::text::Normalizer;

/// Deterministic local path of a book: `{output_dir}/libro_{id}.{ext}`.
///
/// The existence of this file is the only persisted state of a run.
#[must_use]
pub fn book_file_path(output_dir: &Path, id: BookId, extension: FileExtension) -> PathBuf {
    output_dir.join(format!("libro_{id}.{extension}"))
}

/// What happened to one book.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The book was downloaded and written.
    Downloaded {
        /// Written file.
        path: PathBuf,
        /// Bytes written to disk.
        bytes: u64,
        /// Whether the content went through the normalizer.
        normalized: bool,
    },
    /// A file for the resolved format already existed and was kept as is.
    AlreadyPresent {
        /// Existing file.
        path: PathBuf,
    },
    /// No format template answered its probe.
    Unavailable,
    /// Download or write failed.
    Failed {
        /// Underlying cause.
        error: DownloadError,
    },
}

impl FetchOutcome {
    /// `true` for [`Downloaded`](Self::Downloaded) and
    /// [`AlreadyPresent`](Self::AlreadyPresent).
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Downloaded { .. } | Self::AlreadyPresent { .. })
    }
}

/// Outcome of one dispatched fetch.
#[derive(Debug)]
pub struct DownloadResult {
    /// The book.
    pub id: BookId,
    /// What happened.
    pub outcome: FetchOutcome,
}

impl DownloadResult {
    /// Whether the book counts as downloaded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Anything the engine can run per book.
///
/// Implementations must never fail outright: every error is reported
/// through [`FetchOutcome`].
#[async_trait]
pub trait BookFetch: Send + Sync {
    /// Fetches one book.
    async fn fetch(&self, id: BookId) -> FetchOutcome;
}

/// Fetches books from the catalog into an output folder.
#[derive(Debug, Clone)]
pub struct BookFetcher {
    client: HttpClient,
    resolver: FormatResolver,
    normalizer: Arc<Normalizer>,
    output_dir: PathBuf,
    download_timeout: Duration,
}

impl BookFetcher {
    /// Creates a fetcher from its collaborators.
    #[must_use]
    pub fn new(
        client: HttpClient,
        resolver: FormatResolver,
        normalizer: Arc<Normalizer>,
        output_dir: impl Into<PathBuf>,
        download_timeout: Duration,
    ) -> Self {
        Self {
            client,
            resolver,
            normalizer,
            output_dir: output_dir.into(),
            download_timeout,
        }
    }

    /// Creates a fetcher with the English + Spanish normalizer and a client
    /// using the configured User-Agent.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the HTTP client cannot be built.
    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = HttpClient::with_user_agent(&config.user_agent)?;
        Ok(Self::with_client(
            client,
            Arc::new(Normalizer::english_spanish()),
            config,
        ))
    }

    /// Creates a fetcher sharing an existing client and normalizer.
    #[must_use]
    pub fn with_client(
        client: HttpClient,
        normalizer: Arc<Normalizer>,
        config: &FetchConfig,
    ) -> Self {
        let resolver = FormatResolver::from_config(client.clone(), config);
        Self::new(
            client,
            resolver,
            normalizer,
            config.output_dir.clone(),
            config.download_timeout,
        )
    }

    /// Fetches one book and reports plain success or failure.
    pub async fn fetch_book(&self, id: BookId) -> bool {
        self.fetch(id).await.is_success()
    }

    /// Downloads `resolved` into `path`, normalizing plain text.
    ///
    /// Returns the number of bytes written and whether normalization ran.
    /// A partially written file is removed on error.
    async fn download(
        &self,
        resolved: &ResolvedBook,
        path: &Path,
    ) -> Result<(u64, bool), DownloadError> {
        let normalized = resolved.extension().is_plain_text();
        let content = if normalized {
            let text = self
                .client
                .get_text(&resolved.url, self.download_timeout)
                .await?;
            self.normalizer.normalize(&text).into_bytes()
        } else {
            self.client
                .get_bytes(&resolved.url, self.download_timeout)
                .await?
        };

        if let Err(e) = tokio::fs::write(path, &content).await {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
            return Err(DownloadError::io(path, e));
        }

        Ok((content.len() as u64, normalized))
    }
}

#[async_trait]
impl BookFetch for BookFetcher {
    #[instrument(skip(self), fields(book_id = %id))]
    async fn fetch(&self, id: BookId) -> FetchOutcome {
        let Some(resolved) = self.resolver.resolve(id).await else {
            return FetchOutcome::Unavailable;
        };

        let path = book_file_path(&self.output_dir, id, resolved.extension());
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "already downloaded, skipping");
            return FetchOutcome::AlreadyPresent { path };
        }

        match self.download(&resolved, &path).await {
            Ok((bytes, normalized)) => {
                info!(path = %path.display(), bytes, normalized, "book saved");
                FetchOutcome::Downloaded {
                    path,
                    bytes,
                    normalized,
                }
            }
            Err(error) => {
                warn!(url = %resolved.url, error = %error, "book download failed");
                FetchOutcome::Failed { error }
            }
        }
    }
}
