//! Run configuration for a bulk download.
//!
//! [`FetchConfig`] carries every tunable of a run. The defaults reproduce
//! the stock behaviour: the Project Gutenberg catalog, a `libros` output
//! folder, ten workers, 5 s probes and 10 s downloads.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::download::constants::{
    CATALOG_TIMEOUT_SECS, DOWNLOAD_TIMEOUT_SECS, MAX_CONCURRENCY, MIN_CONCURRENCY,
    PROBE_TIMEOUT_SECS,
};
use crate::download::DEFAULT_CONCURRENCY;
use crate::user_agent::BROWSER_USER_AGENT;

/// Default catalog root.
pub const DEFAULT_BASE_URL: &str = "https://gutenberg.org";

/// Default output folder, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "libros";

/// Errors raised by [`FetchConfig::validate`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
    },

    /// Worker count outside the accepted range.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
    },

    /// A timeout of zero would fail every request.
    #[error("{name} must be greater than zero")]
    ZeroTimeout {
        /// Name of the offending setting.
        name: &'static str,
    },
}

/// Settings for one bulk download run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Catalog root, without trailing slash (e.g. `https://gutenberg.org`).
    pub base_url: String,
    /// Folder receiving `libro_{id}.{ext}` files.
    pub output_dir: PathBuf,
    /// Number of books fetched concurrently.
    pub concurrency: usize,
    /// Timeout for each format probe.
    pub probe_timeout: Duration,
    /// Timeout for each book body download.
    pub download_timeout: Duration,
    /// Timeout for the top-books listing page.
    pub catalog_timeout: Duration,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            download_timeout: Duration::from_secs(DOWNLOAD_TIMEOUT_SECS),
            catalog_timeout: Duration::from_secs(CATALOG_TIMEOUT_SECS),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Returns a config pointing at `base_url`, trailing slashes stripped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns a config writing into `output_dir`.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Checks values the runtime cannot recover from.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a malformed base URL, an out-of-range
    /// worker count or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|_| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
            });
        }

        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::InvalidConcurrency {
                value: self.concurrency,
            });
        }

        for (name, value) in [
            ("probe timeout", self.probe_timeout),
            ("download timeout", self.download_timeout),
            ("catalog timeout", self.catalog_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroTimeout { name });
            }
        }

        Ok(())
    }
}
