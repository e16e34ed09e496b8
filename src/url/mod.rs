//! URL handling module for Sitewalk
//!
//! This module provides URL parsing, canonicalization for deduplication,
//! and the single-site scope check used by the scheduler.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_same_site};
pub use normalize::canonicalize;

/// Parses a URL string, mapping failures into a [`UrlError`]
///
/// Relative references are rejected here; the scheduler only ever deals with
/// absolute URLs produced by the extractor or supplied as the seed.
///
/// # Examples
///
/// ```
/// use sitewalk::url::parse_url;
///
/// assert!(parse_url("https://example.com/page").is_ok());
/// assert!(parse_url("http://exa mple.com/").is_err());
/// ```
pub fn parse_url(url_str: &str) -> Result<Url, UrlError> {
    Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))
}
