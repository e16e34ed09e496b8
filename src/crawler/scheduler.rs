//! Crawl scheduler: admission-controlled recursive traversal
//!
//! Each unit of work is one candidate URL running as its own tokio task:
//! 1. Wait for an admission slot
//! 2. Parse the URL and drop it if it is off-site
//! 3. Canonicalize it and pass the ledger's first-visit gate
//! 4. On a first visit, fetch, extract, store and fan out to every link
//!
//! A unit's admission slot is released when it finishes, and its
//! outstanding-work ticket is dropped after its children are registered, so
//! the tracker reaching zero means the whole site has been walked.

use crate::config::CrawlConfig;
use crate::crawler::admission::{AdmissionGate, WorkTracker};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::PageExtractor;
use crate::state::{PageRecord, Visit, VisitLedger};
use crate::url::{canonicalize, is_same_site, parse_url};
use std::sync::Arc;

/// Why a unit of work ended without fetching anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterReason {
    /// The URL could not be parsed or canonicalized
    Unparseable,
    /// The URL's hostname differs from the seed's
    OffSite,
    /// The page is new but the page budget is spent
    BudgetExhausted,
    /// The crawl was cancelled before the unit was admitted
    Cancelled,
}

/// How a unit of work ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Dropped before the first-visit gate, or refused by it
    Filtered(FilterReason),
    /// The page was already known; its visit counter was incremented
    Revisit,
    /// First visit, but the fetch failed; the page stays in the ledger without fields
    FetchFailed,
    /// First visit, fields stored; `links` are the units of work to create next
    Extracted { links: Vec<String> },
}

/// One crawl session: shared ledger, admission gate and work tracker
///
/// Cloning is cheap and every clone drives the same crawl, which is how units
/// of work share the session. Independent `Scheduler`s never share state.
#[derive(Clone)]
pub struct Scheduler {
    config: Arc<CrawlConfig>,
    ledger: Arc<VisitLedger>,
    gate: AdmissionGate,
    tracker: WorkTracker,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn PageExtractor>,
}

impl Scheduler {
    /// Creates a scheduler with an empty ledger
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawl configuration
    /// * `fetcher` - Source of page markup
    /// * `extractor` - Turns markup into page fields
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn PageExtractor>,
    ) -> Self {
        let gate = AdmissionGate::new(config.max_concurrency);

        Self {
            config: Arc::new(config),
            ledger: Arc::new(VisitLedger::new()),
            gate,
            tracker: WorkTracker::new(),
            fetcher,
            extractor,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// The ledger this crawl writes to
    pub fn ledger(&self) -> Arc<VisitLedger> {
        Arc::clone(&self.ledger)
    }

    /// Units of work created but not yet finished
    pub fn outstanding(&self) -> usize {
        self.tracker.outstanding()
    }

    /// Crawls the whole site from the configured base URL
    ///
    /// Returns the final ledger contents once no unit of work is outstanding.
    pub async fn run(&self) -> Vec<PageRecord> {
        self.schedule(self.config.base_url.as_str());
        self.wait().await;
        self.ledger.snapshot()
    }

    /// Waits until every scheduled unit of work has finished
    pub async fn wait(&self) {
        self.tracker.wait_idle().await;
    }

    /// Submits one unit of work
    ///
    /// The unit is registered with the outstanding-work tracker before this
    /// returns. Must be called from within a tokio runtime.
    pub fn schedule(&self, raw_url: &str) {
        let ticket = self.tracker.register();
        let scheduler = self.clone();
        let raw_url = raw_url.to_string();

        tokio::spawn(async move {
            let _ticket = ticket;

            if let UnitOutcome::Extracted { links } = scheduler.process(&raw_url).await {
                for link in &links {
                    scheduler.schedule(link);
                }
            }
        });
    }

    /// Stops admitting work
    ///
    /// Units waiting for a slot end as `Filtered(Cancelled)`; units already
    /// admitted finish normally, but their links are never admitted. `run`
    /// still returns, with whatever the ledger holds.
    pub fn cancel(&self) {
        if !self.gate.is_closed() {
            tracing::info!("Cancelling crawl; {} units outstanding", self.outstanding());
            self.gate.close();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.gate.is_closed()
    }

    /// Runs a single unit of work through admission, filtering and fetching
    pub(crate) async fn process(&self, raw_url: &str) -> UnitOutcome {
        let Some(_slot) = self.gate.admit().await else {
            tracing::debug!("Not admitting {}: crawl cancelled", raw_url);
            return UnitOutcome::Filtered(FilterReason::Cancelled);
        };

        let url = match parse_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping unparseable URL: {}", e);
                return UnitOutcome::Filtered(FilterReason::Unparseable);
            }
        };

        if !is_same_site(&url, &self.config.base_url) {
            tracing::debug!("Skipping off-site URL {}", raw_url);
            return UnitOutcome::Filtered(FilterReason::OffSite);
        }

        let key = match canonicalize(raw_url) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Skipping URL that cannot be canonicalized: {}", e);
                return UnitOutcome::Filtered(FilterReason::Unparseable);
            }
        };

        match self.ledger.admit(&key, raw_url, self.config.max_pages) {
            Visit::First => {}
            Visit::Revisit => {
                tracing::trace!("Revisit of {}", key);
                return UnitOutcome::Revisit;
            }
            Visit::OverBudget => {
                tracing::debug!(
                    "Page budget of {} reached, not visiting {}",
                    self.config.max_pages,
                    raw_url
                );
                return UnitOutcome::Filtered(FilterReason::BudgetExhausted);
            }
        }

        tracing::info!("crawling {}", raw_url);

        let html = match self.fetcher.fetch(raw_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.ledger.mark_failed(&key, e.to_string());
                return UnitOutcome::FetchFailed;
            }
        };

        let fields = self.extractor.extract(&html, raw_url);
        let links = fields.outgoing_links.clone();
        self.ledger.store_data(&key, fields);

        UnitOutcome::Extracted { links }
    }
}
