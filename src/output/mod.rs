//! Output module for crawl reports and summaries
//!
//! This module handles:
//! - Writing the `;`-delimited CSV page report
//! - Printing the page listing and statistics to the console
//! - Generating an optional markdown summary of the run

mod csv_report;
mod markdown;
pub mod stats;
mod traits;

pub use csv_report::{write_csv_report, CsvReportWriter, CSV_HEADERS};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{format_page_listing, print_page_listing, print_statistics, CrawlStatistics};
pub use traits::{CrawlSummary, OutputError, OutputResult, ReportWriter};

use crate::crawler::CrawlOutcome;
use crate::state::PageState;

/// Builds a crawl summary from a finished crawl
///
/// # Arguments
///
/// * `outcome` - The finished crawl
/// * `config_hash` - Hash of the configuration file used, if any
pub fn generate_summary(outcome: &CrawlOutcome, config_hash: Option<&str>) -> CrawlSummary {
    let stats = CrawlStatistics::from_pages(&outcome.pages);

    let duration_seconds = outcome
        .duration()
        .to_std()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);

    let mut top_referenced: Vec<(String, u32)> = outcome
        .pages
        .iter()
        .map(|page| (page.key.clone(), page.visits))
        .collect();
    // Highest count first, ties by key
    top_referenced.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let failed_pages = outcome
        .pages
        .iter()
        .filter(|page| page.state == PageState::FetchFailed)
        .map(|page| (page.key.clone(), page.error.clone().unwrap_or_default()))
        .collect();

    CrawlSummary {
        base_url: outcome.base_url.clone(),
        started_at: outcome.started_at.to_rfc3339(),
        finished_at: outcome.finished_at.to_rfc3339(),
        duration_seconds,
        status: if outcome.cancelled { "cancelled" } else { "completed" }.to_string(),
        config_hash: config_hash.map(str::to_string),
        total_pages: stats.total_pages,
        total_visits: stats.total_visits,
        total_links: stats.total_links,
        total_images: stats.total_images,
        pages_extracted: stats.count(PageState::Extracted),
        pages_failed: stats.count(PageState::FetchFailed),
        pages_pending: stats.count(PageState::Fetching),
        top_referenced,
        failed_pages,
    }
}
