//! Output traits and types
//!
//! This module defines the interface for report writers and the summary
//! data assembled after a crawl.

use crate::state::PageRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes the final ledger contents somewhere durable
///
/// Writers receive the records already sorted by canonical key and must
/// keep that order.
pub trait ReportWriter {
    /// Writes one report covering every page
    fn write_report(&mut self, pages: &[PageRecord]) -> OutputResult<()>;
}

/// Summary of a finished crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    // Run metadata
    pub base_url: String,
    pub started_at: String,
    pub finished_at: String,
    pub duration_seconds: f64,
    pub status: String,
    pub config_hash: Option<String>,

    // Overall statistics
    pub total_pages: u64,
    pub total_visits: u64,
    pub total_links: u64,
    pub total_images: u64,

    // State breakdown
    pub pages_extracted: u64,
    pub pages_failed: u64,
    pub pages_pending: u64,

    /// Most-referenced pages as (canonical key, visits), highest first
    pub top_referenced: Vec<(String, u32)>,

    /// Pages whose fetch failed, as (canonical key, error message)
    pub failed_pages: Vec<(String, String)>,
}

impl CrawlSummary {
    /// Creates a new empty crawl summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pages whose fetch finished one way or another
    pub fn total_terminal_pages(&self) -> u64 {
        self.pages_extracted + self.pages_failed
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let terminal = self.total_terminal_pages();
        if terminal == 0 {
            return 0.0;
        }
        (self.pages_extracted as f64 / terminal as f64) * 100.0
    }

    /// Returns the error rate as a percentage
    pub fn error_rate(&self) -> f64 {
        let terminal = self.total_terminal_pages();
        if terminal == 0 {
            return 0.0;
        }
        (self.pages_failed as f64 / terminal as f64) * 100.0
    }
}
