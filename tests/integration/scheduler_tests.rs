//! Integration tests for the crawl scheduler
//!
//! These tests drive the scheduler against in-memory sites, so traversal,
//! deduplication and admission control can be checked without a network.

use async_trait::async_trait;
use sitewalk::config::CrawlConfig;
use sitewalk::crawler::{FetchError, HtmlExtractor, PageFetcher, Scheduler};
use sitewalk::state::PageState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serves fixed markup per URL; unknown URLs answer 404
struct InMemorySite {
    pages: HashMap<String, String>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetches: AtomicUsize,
}

impl InMemorySite {
    fn new(pages: &[(&str, String)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.clone()))
                .collect(),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PageFetcher for InMemorySite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn links(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body><h1>Page</h1><p>Text</p>{}</body></html>", anchors)
}

fn scheduler(site: Arc<InMemorySite>, max_concurrency: usize, max_pages: usize) -> Scheduler {
    let config = CrawlConfig::new("http://x.test/", max_concurrency, max_pages).unwrap();
    Scheduler::new(config, site, Arc::new(HtmlExtractor))
}

async fn run(scheduler: &Scheduler) -> Vec<sitewalk::PageRecord> {
    tokio::time::timeout(Duration::from_secs(10), scheduler.run())
        .await
        .expect("crawl did not terminate")
}

#[tokio::test]
async fn test_cycle_is_walked_once() {
    let site = Arc::new(InMemorySite::new(&[
        ("http://x.test/", links(&["/b", "/c"])),
        ("http://x.test/b", links(&["/"])),
        ("http://x.test/c", links(&["/"])),
    ]));
    let s = scheduler(Arc::clone(&site), 3, 100);

    let pages = run(&s).await;

    let visits: Vec<(&str, u32)> = pages.iter().map(|p| (p.key.as_str(), p.visits)).collect();
    assert_eq!(visits, vec![("x.test", 3), ("x.test/b", 1), ("x.test/c", 1)]);
    assert!(pages.iter().all(|p| p.state == PageState::Extracted));
    assert_eq!(site.fetches.load(Ordering::SeqCst), 3);
    assert_eq!(s.outstanding(), 0);
}

#[tokio::test]
async fn test_off_site_links_are_recorded_but_not_followed() {
    let site = Arc::new(InMemorySite::new(&[
        ("http://x.test/", links(&["/a", "http://other.test/z"])),
        ("http://x.test/a", links(&[])),
    ]));
    let s = scheduler(Arc::clone(&site), 2, 100);

    let pages = run(&s).await;

    let keys: Vec<&str> = pages.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["x.test", "x.test/a"]);
    assert!(pages[0]
        .outgoing_links
        .contains(&"http://other.test/z".to_string()));
    assert_eq!(site.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_variants_of_one_page_share_a_record() {
    let site = Arc::new(InMemorySite::new(&[
        (
            "http://x.test/",
            links(&["/a", "/a/", "/a#top", "https://X.TEST/a?ref=1"]),
        ),
        ("http://x.test/a", links(&[])),
        ("http://x.test/a/", links(&[])),
    ]));
    let s = scheduler(Arc::clone(&site), 1, 100);

    let pages = run(&s).await;

    assert_eq!(pages.len(), 2);
    let a = pages.iter().find(|p| p.key == "x.test/a").unwrap();
    assert_eq!(a.visits, 4);
    assert_eq!(site.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_fetch_failure_keeps_page_with_empty_fields() {
    let site = Arc::new(InMemorySite::new(&[(
        "http://x.test/",
        links(&["/missing"]),
    )]));
    let s = scheduler(site, 2, 100);

    let pages = run(&s).await;

    assert_eq!(pages.len(), 2);
    let missing = &pages[1];
    assert_eq!(missing.key, "x.test/missing");
    assert_eq!(missing.visits, 1);
    assert_eq!(missing.state, PageState::FetchFailed);
    assert!(missing.heading.is_none());
    assert!(missing.first_paragraph.is_none());
    assert!(missing.outgoing_links.is_empty());
    assert!(missing.image_urls.is_empty());
}

#[tokio::test]
async fn test_concurrency_never_exceeds_limit() {
    let children: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

    let mut pages = vec![("http://x.test/".to_string(), links(&child_refs))];
    for child in &children {
        pages.push((format!("http://x.test{}", child), links(&["/"])));
    }
    let pages: Vec<(&str, String)> = pages
        .iter()
        .map(|(url, html)| (url.as_str(), html.clone()))
        .collect();

    let site = Arc::new(InMemorySite::new(&pages).with_delay(Duration::from_millis(10)));
    let s = scheduler(Arc::clone(&site), 3, 100);

    let result = run(&s).await;

    assert_eq!(result.len(), 21);
    let max = site.max_in_flight.load(Ordering::SeqCst);
    assert!(max >= 1 && max <= 3, "max in flight was {}", max);
    assert_eq!(result[0].visits, 21);
}

#[tokio::test]
async fn test_page_budget_bounds_the_ledger() {
    let children: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
    let site = Arc::new(InMemorySite::new(&[(
        "http://x.test/",
        links(&child_refs),
    )]));
    let s = scheduler(Arc::clone(&site), 4, 5);

    let pages = run(&s).await;

    assert_eq!(pages.len(), 5);
    assert_eq!(site.fetches.load(Ordering::SeqCst), 5);
    assert!(pages.iter().any(|p| p.key == "x.test"));
}

#[tokio::test]
async fn test_cancel_before_run_records_nothing() {
    let site = Arc::new(InMemorySite::new(&[("http://x.test/", links(&["/a"]))]));
    let s = scheduler(Arc::clone(&site), 2, 100);

    s.cancel();
    let pages = run(&s).await;

    assert!(pages.is_empty());
    assert_eq!(site.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_mid_crawl_finishes_in_flight_page() {
    let site = Arc::new(
        InMemorySite::new(&[
            ("http://x.test/", links(&["/a", "/b"])),
            ("http://x.test/a", links(&[])),
            ("http://x.test/b", links(&[])),
        ])
        .with_delay(Duration::from_millis(200)),
    );
    let s = scheduler(Arc::clone(&site), 1, 100);

    let canceller = {
        let s = s.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            s.cancel();
        })
    };

    let pages = run(&s).await;
    canceller.await.unwrap();

    assert!(s.is_cancelled());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].key, "x.test");
    assert_eq!(pages[0].state, PageState::Extracted);
    assert_eq!(s.outstanding(), 0);
}

#[tokio::test]
async fn test_independent_crawls_do_not_share_state() {
    let site = Arc::new(InMemorySite::new(&[("http://x.test/", links(&[]))]));
    let first = scheduler(Arc::clone(&site), 1, 100);
    let second = scheduler(Arc::clone(&site), 1, 100);

    assert_eq!(run(&first).await.len(), 1);
    assert_eq!(run(&second).await.len(), 1);
    assert_eq!(site.fetches.load(Ordering::SeqCst), 2);
}
