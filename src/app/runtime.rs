use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use bookfetch_core::{FetchConfig, Pipeline, prepare_output_dir};
use clap::Parser;
use tracing::{debug, info};

use crate::app::{output, progress, prompt, terminal};
use crate::cli::Args;

fn config_from_args(args: &Args) -> FetchConfig {
    let mut config = FetchConfig::default()
        .with_base_url(args.base_url.as_str())
        .with_output_dir(args.output_dir.clone());
    config.concurrency = usize::from(args.concurrency);
    config.probe_timeout = Duration::from_secs(args.probe_timeout);
    config.download_timeout = Duration::from_secs(args.download_timeout);
    config
}

pub(crate) async fn run_bookfetch() -> Result<()> {
    let args = Args::parse();

    let no_color = terminal::no_color_env_requested() || terminal::is_dumb_terminal();
    terminal::init_tracing(terminal::resolve_default_log_level(&args), no_color);
    debug!(?args, "CLI arguments parsed");

    let pipeline = Pipeline::new(config_from_args(&args)).context("invalid configuration")?;
    let config = pipeline.config();
    prepare_output_dir(&config.output_dir)?;

    let count = match args.count {
        Some(count) => count,
        None => prompt::prompt_count(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let chatty = !args.quiet && !args.json;
    if chatty {
        println!("\n{}\n", output::fetching_line(count, &config.base_url));
    }

    let ids = pipeline
        .list(count)
        .await
        .context("failed to fetch the top-books listing")?;
    info!(books = ids.len(), "book list ready");
    if chatty {
        println!("{}\n", output::found_line(ids.len()));
    }

    let visible = terminal::should_show_progress(
        io::stderr().is_terminal(),
        args.quiet,
        args.no_progress,
        terminal::is_dumb_terminal(),
    );
    let bar = progress::book_progress_bar(visible, ids.len());
    let reporter = bar.clone();

    let summary = pipeline
        .download(ids, move |result| {
            if let Some(line) = output::failure_line(result.id, &result.outcome) {
                progress::print_diagnostic(&reporter, &line);
            }
            reporter.inc(1);
        })
        .await?;
    bar.finish_and_clear();

    if args.json {
        println!("{}", output::format_summary_json(&summary)?);
    } else {
        println!("\n{}\n", output::format_summary(&summary));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_config_from_args_maps_flags() {
        let args = Args::try_parse_from([
            "bookfetch",
            "--base-url",
            "http://localhost:8080/",
            "-o",
            "out",
            "-c",
            "4",
            "--probe-timeout",
            "2",
            "--download-timeout",
            "30",
        ])
        .unwrap();

        let config = config_from_args(&args);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.download_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_default_args() {
        let args = Args::try_parse_from(["bookfetch"]).unwrap();
        let config = config_from_args(&args);
        assert_eq!(config.base_url, "https://gutenberg.org");
        assert_eq!(config.concurrency, 10);
    }
}
