//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of pages
//! - HTML parsing and field extraction
//! - Admission control and completion tracking
//! - The recursive crawl scheduler
//! - Overall crawl coordination

mod admission;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use admission::{AdmissionGate, WorkTicket, WorkTracker};
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_url, FetchError, HttpFetcher, PageFetcher};
pub use parser::{parse_html, ExtractedFields, HtmlExtractor, PageExtractor};
pub use scheduler::{FilterReason, Scheduler, UnitOutcome};
