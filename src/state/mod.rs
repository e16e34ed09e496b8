//! State module for tracking crawl progress
//!
//! This module provides the shared bookkeeping for a crawl.
//!
//! # Components
//!
//! - `PageState`: Tracks what happened to an individual page (fetching, extracted, failed)
//! - `VisitLedger`: The mutex-guarded map from canonical key to `PageRecord`,
//!   the single admission gate deciding which unit of work fetches a page

mod ledger;
mod page_state;

// Re-export main types
pub use ledger::{PageRecord, Visit, VisitLedger};
pub use page_state::PageState;
