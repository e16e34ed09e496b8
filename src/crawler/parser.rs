//! HTML extractor for page fields, links and images
//!
//! This module turns raw markup into the fields recorded for each page:
//! - The first `<h1>` heading
//! - The first `<p>` paragraph
//! - Outgoing links from `<a href="...">`
//! - Image references from `<img src="...">`
//!
//! Extraction is best-effort: a missing element yields `None`, and a link or
//! image that cannot be resolved is skipped without failing the page.

use scraper::{Html, Selector};
use url::Url;

/// Fields extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    /// Text of the first `<h1>` (trimmed), if present and non-blank
    pub heading: Option<String>,

    /// Text of the first `<p>` (trimmed), if present and non-blank
    pub first_paragraph: Option<String>,

    /// Absolute URLs of all links, in document order
    pub outgoing_links: Vec<String>,

    /// Absolute URLs of all images, in document order
    pub image_urls: Vec<String>,
}

/// Turns fetched markup into [`ExtractedFields`]
///
/// Implementations must not fail: absent elements and malformed references
/// are represented by empty values.
pub trait PageExtractor: Send + Sync {
    /// Extracts the fields of the page at `source_url` from `html`
    fn extract(&self, html: &str, source_url: &str) -> ExtractedFields;
}

/// The default extractor, backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl PageExtractor for HtmlExtractor {
    fn extract(&self, html: &str, source_url: &str) -> ExtractedFields {
        parse_html(html, source_url)
    }
}

/// Parses HTML content and extracts the page fields
///
/// # Link Extraction Rules
///
/// - `href`/`src` values are resolved against `source_url`
/// - Blank references are skipped
/// - References that do not resolve to an `http`/`https` URL are skipped
///   (`javascript:`, `mailto:`, `tel:`, `data:` and the like)
///
/// If `source_url` itself cannot be parsed, the heading and paragraph are
/// still returned but no links or images are.
///
/// # Example
///
/// ```
/// use sitewalk::crawler::parse_html;
///
/// let html = r#"<html><body><h1>Title</h1><p>Intro</p><a href="/next">Next</a></body></html>"#;
/// let fields = parse_html(html, "https://example.com/start");
/// assert_eq!(fields.heading.as_deref(), Some("Title"));
/// assert_eq!(fields.outgoing_links, vec!["https://example.com/next".to_string()]);
/// ```
pub fn parse_html(html: &str, source_url: &str) -> ExtractedFields {
    let document = Html::parse_document(html);

    let heading = first_text(&document, "h1");
    let first_paragraph = first_text(&document, "p");

    let base_url = match Url::parse(source_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot resolve references on {}: {}", source_url, e);
            return ExtractedFields {
                heading,
                first_paragraph,
                ..ExtractedFields::default()
            };
        }
    };

    ExtractedFields {
        heading,
        first_paragraph,
        outgoing_links: extract_references(&document, "a[href]", "href", &base_url),
        image_urls: extract_references(&document, "img[src]", "src", &base_url),
    }
}

/// Returns the trimmed text of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects the resolved `attribute` of every element matching `selector`
fn extract_references(
    document: &Html,
    selector: &str,
    attribute: &str,
    base_url: &Url,
) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .filter_map(|reference| resolve_reference(reference, base_url))
        .collect()
}

/// Resolves a reference to an absolute HTTP(S) URL
///
/// Returns None if the reference should be skipped:
/// - Empty or whitespace-only references
/// - References that fail to resolve
/// - Non-HTTP(S) URLs after resolution
fn resolve_reference(reference: &str, base_url: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    match base_url.join(reference) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::debug!("Skipping reference {:?} on {}: {}", reference, base_url, e);
            None
        }
    }
}
