//! The visit ledger: shared, mutex-protected page bookkeeping
//!
//! Every operation takes the single lock for its whole read-modify-write, so
//! `record_visit`/`admit` behave as a linearizable test-and-set per key: for
//! any canonical key exactly one caller ever sees a first visit.

use crate::crawler::ExtractedFields;
use crate::state::PageState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One entry per distinct canonical page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Canonical key (hostname + path), the identity of the page
    pub key: String,

    /// Absolute URL as first observed
    pub url: String,

    /// Text of the first heading, if any
    pub heading: Option<String>,

    /// Text of the first paragraph, if any
    pub first_paragraph: Option<String>,

    /// Outgoing links in document order (absolute URLs)
    pub outgoing_links: Vec<String>,

    /// Image references in document order (absolute URLs)
    pub image_urls: Vec<String>,

    /// Number of times this page was referenced, including the first visit
    pub visits: u32,

    /// What happened to the page
    pub state: PageState,

    /// Fetch error message for failed pages
    pub error: Option<String>,
}

impl PageRecord {
    fn first_visit(key: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            url: url.to_string(),
            heading: None,
            first_paragraph: None,
            outgoing_links: Vec::new(),
            image_urls: Vec::new(),
            visits: 1,
            state: PageState::Fetching,
            error: None,
        }
    }
}

/// Result of presenting a key to the ledger's admission gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// First visit: the caller owns fetching and extracting this page
    First,

    /// The page is already known; its visit counter was incremented
    Revisit,

    /// The page is new but the page budget is spent; nothing was recorded
    OverBudget,
}

/// Mapping from canonical key to [`PageRecord`], guarded by a single lock
#[derive(Debug, Default)]
pub struct VisitLedger {
    pages: Mutex<HashMap<String, PageRecord>>,
}

impl VisitLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    // A unit of work that panicked while holding the lock cannot leave a
    // record half-written, so a poisoned lock is still safe to use.
    fn pages(&self) -> MutexGuard<'_, HashMap<String, PageRecord>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a visit to `key`, reporting whether it is the first
    ///
    /// Inserts a record with a visit counter of 1 if the key is absent and
    /// returns true; otherwise increments the counter and returns false.
    pub fn record_visit(&self, key: &str, url: &str) -> bool {
        self.admit(key, url, usize::MAX) == Visit::First
    }

    /// Records a visit to `key`, refusing new pages once `max_pages` are known
    ///
    /// Revisits of known pages are always counted, even after the budget is
    /// spent.
    pub fn admit(&self, key: &str, url: &str, max_pages: usize) -> Visit {
        let mut pages = self.pages();

        if let Some(record) = pages.get_mut(key) {
            record.visits += 1;
            return Visit::Revisit;
        }

        if pages.len() >= max_pages {
            return Visit::OverBudget;
        }

        pages.insert(key.to_string(), PageRecord::first_visit(key, url));
        Visit::First
    }

    /// Attaches extracted fields to the record for `key`
    ///
    /// Fields are set once; a record that already left the `Fetching` state
    /// is left untouched. Returns true if the fields were stored.
    pub fn store_data(&self, key: &str, fields: ExtractedFields) -> bool {
        let mut pages = self.pages();

        let Some(record) = pages.get_mut(key) else {
            tracing::warn!("store_data for unknown page {}", key);
            return false;
        };

        if record.state.is_terminal() {
            tracing::debug!("Ignoring second store_data for {}", key);
            return false;
        }

        record.heading = fields.heading;
        record.first_paragraph = fields.first_paragraph;
        record.outgoing_links = fields.outgoing_links;
        record.image_urls = fields.image_urls;
        record.state = PageState::Extracted;
        true
    }

    /// Marks the record for `key` as failed, keeping its visit count
    pub fn mark_failed(&self, key: &str, error: impl Into<String>) {
        let mut pages = self.pages();

        if let Some(record) = pages.get_mut(key) {
            if !record.state.is_terminal() {
                record.state = PageState::FetchFailed;
                record.error = Some(error.into());
            }
        }
    }

    /// Returns a copy of the record for `key`
    pub fn get(&self, key: &str) -> Option<PageRecord> {
        self.pages().get(key).cloned()
    }

    /// Returns the visit counter for `key`
    pub fn visits(&self, key: &str) -> Option<u32> {
        self.pages().get(key).map(|record| record.visits)
    }

    /// Number of distinct pages recorded
    pub fn len(&self) -> usize {
        self.pages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages().is_empty()
    }

    /// Exports every record, sorted by canonical key
    ///
    /// Each record is copied under the lock, so no partially-updated record
    /// is ever visible.
    pub fn snapshot(&self) -> Vec<PageRecord> {
        let mut records: Vec<PageRecord> = self.pages().values().cloned().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }
}
