//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use bookfetch_core::DEFAULT_CONCURRENCY;
use bookfetch_core::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR};

/// Bulk download the most popular public-domain books.
///
/// Bookfetch reads the catalog's top-books listing, picks the best available
/// format for each book (plain text first) and saves it as
/// `libro_{id}.{ext}`. Plain text is lowercased and stripped of English and
/// Spanish stopwords before writing.
#[derive(Parser, Debug)]
#[command(name = "bookfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Number of books to download (prompted for when omitted)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Folder the books are saved in
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Catalog root URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Maximum concurrent downloads (1-100)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY as u8, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub concurrency: u8,

    /// Timeout of each format probe in seconds
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub probe_timeout: u64,

    /// Timeout of each book download in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub download_timeout: u64,

    /// Increase output verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}
