//! Page state definitions for tracking crawl progress
//!
//! A page enters the ledger as `Fetching` the moment its first visit is
//! recorded, and leaves that state exactly once.

use std::fmt;

/// Represents the current state of a page in the visit ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// First visit recorded, fetch and extraction in progress
    Fetching,

    // ===== Terminal States =====
    /// Page was fetched and its fields were extracted
    Extracted,

    /// Fetch failed (transport, HTTP status or content type); no fields stored
    FetchFailed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Fetching)
    }

    /// Converts the page state to its report string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Extracted => "extracted",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
