//! Statistics computed from the final ledger
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from a ledger snapshot.

use crate::state::{PageRecord, PageState};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Number of distinct pages in the ledger
    pub total_pages: u64,

    /// Count of pages by state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Sum of every page's visit counter
    pub total_visits: u64,

    /// Total number of outgoing links recorded
    pub total_links: u64,

    /// Total number of image references recorded
    pub total_images: u64,
}

impl CrawlStatistics {
    /// Computes statistics over a ledger snapshot
    pub fn from_pages(pages: &[PageRecord]) -> Self {
        let mut stats = Self {
            total_pages: pages.len() as u64,
            ..Self::default()
        };

        for page in pages {
            *stats.pages_by_state.entry(page.state).or_insert(0) += 1;
            stats.total_visits += u64::from(page.visits);
            stats.total_links += page.outgoing_links.len() as u64;
            stats.total_images += page.image_urls.len() as u64;
        }

        stats
    }

    /// Number of pages in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }
}

/// Formats the per-page listing printed after a crawl
///
/// One `"<visits> - <key>"` line per page, in the given order, followed by
/// the page total.
pub fn format_page_listing(pages: &[PageRecord]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&format!("{} - {}\n", page.visits, page.key));
    }
    out.push_str(&format!("Pages crawled: {}\n", pages.len()));
    out
}

/// Prints the per-page listing to stdout
pub fn print_page_listing(pages: &[PageRecord]) {
    print!("{}", format_page_listing(pages));
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages crawled: {}", stats.total_pages);
    println!("  Total references: {}", stats.total_visits);
    println!("  Outgoing links found: {}", stats.total_links);
    println!("  Images found: {}", stats.total_images);
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    for (state, count) in state_counts {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    let extracted = stats.count(PageState::Extracted);
    let success_rate = if stats.total_pages > 0 {
        (extracted as f64 / stats.total_pages as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages extracted)",
        success_rate, extracted, stats.total_pages
    );
}
