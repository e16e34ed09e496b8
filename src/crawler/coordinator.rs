//! Crawler coordinator - crawl orchestration around the scheduler
//!
//! This module wires the concrete collaborators into a crawl session and
//! records run timing:
//! - Building the HTTP fetcher and HTML extractor
//! - Seeding the scheduler and waiting for completion
//! - Handing back the final ledger

use crate::config::CrawlConfig;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::{HtmlExtractor, PageExtractor};
use crate::crawler::scheduler::Scheduler;
use crate::state::PageRecord;
use crate::SitewalkError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// The seed URL the crawl started from
    pub base_url: String,

    /// Final ledger contents, sorted by canonical key
    pub pages: Vec<PageRecord>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// True if the crawl was cancelled before the site was exhausted
    pub cancelled: bool,
}

impl CrawlOutcome {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP and extracts with `scraper`
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SitewalkError)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> Result<Self, SitewalkError> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_components(
            config,
            Arc::new(fetcher),
            Arc::new(HtmlExtractor),
        ))
    }

    /// Creates a coordinator with caller-supplied collaborators
    pub fn with_components(
        config: CrawlConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn PageExtractor>,
    ) -> Self {
        Self {
            scheduler: Scheduler::new(config, fetcher, extractor),
        }
    }

    /// The scheduler driving this crawl
    ///
    /// Clone it to cancel the crawl from another task.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs the crawl to completion
    ///
    /// Per-page failures never surface here; they are logged and recorded in
    /// the ledger.
    pub async fn run(&self) -> CrawlOutcome {
        let config = self.scheduler.config();
        tracing::info!(
            "starting crawl of: {} (concurrency: {}, max pages: {})",
            config.base_url,
            config.max_concurrency,
            config.max_pages
        );

        let started_at = Utc::now();
        let start_time = std::time::Instant::now();

        let pages = self.scheduler.run().await;

        let finished_at = Utc::now();
        let cancelled = self.scheduler.is_cancelled();

        tracing::info!(
            "Crawl {}: {} pages in {:?}",
            if cancelled { "cancelled" } else { "completed" },
            pages.len(),
            start_time.elapsed()
        );

        CrawlOutcome {
            base_url: config.base_url.to_string(),
            pages,
            started_at,
            finished_at,
            cancelled,
        }
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The validated crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl completed
/// * `Err(SitewalkError)` - The crawl could not be started
///
/// # Example
///
/// ```no_run
/// use sitewalk::config::CrawlConfig;
/// use sitewalk::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("https://example.com/", 3, 1000)?;
/// let outcome = run_crawl(config).await?;
/// println!("Pages crawled: {}", outcome.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> Result<CrawlOutcome, SitewalkError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
