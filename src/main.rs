//! Sitewalk main entry point
//!
//! This is the command-line interface for the Sitewalk single-site crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use sitewalk::config::{load_config_with_hash, Config};
use sitewalk::crawler::Coordinator;
use sitewalk::output::{
    generate_markdown_summary, generate_summary, print_page_listing, print_statistics,
    write_csv_report, CrawlStatistics,
};
use tracing_subscriber::EnvFilter;

/// Sitewalk: a single-site concurrent web crawler
///
/// Sitewalk crawls every page reachable from the seed URL on the same host,
/// fetching at most <maxConcurrency> pages at once and at most <maxPages>
/// distinct pages, and writes a CSV report of what it found.
#[derive(Parser, Debug)]
#[command(name = "sitewalk")]
#[command(version = "1.0.0")]
#[command(about = "A single-site concurrent web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from; only pages on its host are visited
    #[arg(value_name = "SEED_URL")]
    seed_url: String,

    /// Maximum number of pages fetched at once [default: 3]
    #[arg(value_name = "MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Maximum number of distinct pages to visit [default: 1000]
    #[arg(value_name = "MAX_PAGES")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the CSV report [default: report.csv]
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Also write a markdown summary of the run
    #[arg(short, long, value_name = "FILE")]
    summary: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_settings(&cli)?;
    let crawl_config = config
        .crawl_config(&cli.seed_url)
        .context("invalid crawl settings")?;

    let coordinator = Coordinator::new(crawl_config).context("failed to start crawler")?;

    // Ctrl-C stops admitting new pages; pages in flight still finish
    let scheduler = coordinator.scheduler().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing pages in flight");
            scheduler.cancel();
        }
    });

    let outcome = coordinator.run().await;

    let report_path = Path::new(&config.output.report_path);
    write_csv_report(&outcome.pages, report_path)
        .with_context(|| format!("failed to write report to {}", report_path.display()))?;

    if !cli.quiet {
        print_page_listing(&outcome.pages);
        println!();
        print_statistics(&CrawlStatistics::from_pages(&outcome.pages));
    }

    if let Some(summary_path) = &config.output.summary_path {
        let summary = generate_summary(&outcome, config_hash.as_deref());
        generate_markdown_summary(&summary, Path::new(summary_path))
            .with_context(|| format!("failed to write summary to {}", summary_path))?;
        tracing::info!("Summary written to: {}", summary_path);
    }

    Ok(())
}

/// Loads the configuration file, if any, and applies command-line overrides
///
/// Command-line values take precedence over the file, which takes
/// precedence over the built-in defaults.
fn load_settings(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(max_concurrency) = cli.max_concurrency {
        config.crawler.max_concurrency = max_concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(output) = &cli.output {
        config.output.report_path = output.clone();
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.clone());
    }

    Ok((config, config_hash))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitewalk=info,warn"),
            1 => EnvFilter::new("sitewalk=debug,info"),
            2 => EnvFilter::new("sitewalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
