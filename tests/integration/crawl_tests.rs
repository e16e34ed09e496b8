//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitewalk::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use sitewalk::crawler::{build_http_client, fetch_url, run_crawl, Coordinator, FetchError};
use sitewalk::output::{generate_summary, write_csv_report};
use sitewalk::state::PageState;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given limits
fn create_test_config(max_concurrency: usize, max_pages: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrency,
            max_pages,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "2.0".to_string(),
        },
        output: OutputConfig::default(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Host part of the mock server's canonical keys (the port is dropped)
fn host(server: &MockServer) -> String {
    url::Url::parse(&server.uri())
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string()
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<html><body>
            <h1>Home</h1>
            <p>Welcome to the test site.</p>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="https://elsewhere.test/">Elsewhere</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/page1",
        r#"<html><body><h1>One</h1><img src="/logo.png"><a href="/">Home</a></body></html>"#,
    )
    .await;

    mount_page(
        &mock_server,
        "/page2",
        r#"<html><body><h1>Two</h1><a href="/missing">Gone</a><a href="/data.json">Data</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(3, 100)
        .crawl_config(&format!("{}/", base_url))
        .unwrap();
    let coordinator = Coordinator::new(config).unwrap();
    let outcome = coordinator.run().await;

    let host = host(&mock_server);
    let keys: Vec<String> = outcome.pages.iter().map(|p| p.key.clone()).collect();
    assert_eq!(
        keys,
        vec![
            host.clone(),
            format!("{}/data.json", host),
            format!("{}/missing", host),
            format!("{}/page1", host),
            format!("{}/page2", host),
        ]
    );

    let home = &outcome.pages[0];
    assert_eq!(home.visits, 2);
    assert_eq!(home.heading.as_deref(), Some("Home"));
    assert_eq!(home.first_paragraph.as_deref(), Some("Welcome to the test site."));
    assert_eq!(home.outgoing_links.len(), 3);
    assert!(home
        .outgoing_links
        .contains(&"https://elsewhere.test/".to_string()));

    let page1 = &outcome.pages[3];
    assert_eq!(page1.image_urls, vec![format!("{}/logo.png", base_url)]);

    assert_eq!(outcome.pages[1].state, PageState::FetchFailed);
    assert_eq!(outcome.pages[2].state, PageState::FetchFailed);
    assert!(!outcome.cancelled);

    let summary = generate_summary(&outcome, None);
    assert_eq!(summary.pages_extracted, 3);
    assert_eq!(summary.pages_failed, 2);
}

#[tokio::test]
async fn test_crawl_writes_csv_report() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<h1>Home</h1><p>Intro</p><a href="/about">About</a>"#,
    )
    .await;
    mount_page(&mock_server, "/about", r#"<h1>About</h1><a href="/">Home</a>"#).await;

    let config = create_test_config(2, 100)
        .crawl_config(&mock_server.uri())
        .unwrap();
    let outcome = Coordinator::new(config).unwrap().run().await;

    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.csv");
    write_csv_report(&outcome.pages, &report).unwrap();

    // Rows are ordered by canonical key but carry the URL each page was reached by
    let content = std::fs::read_to_string(&report).unwrap();
    let base_url = mock_server.uri();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "page_url;h1;first_paragraph;outgoing_link_urls;image_urls;references"
    );
    assert_eq!(
        lines[1],
        format!("{}/;Home;Intro;{}/about;;2", base_url, base_url)
    );
    assert_eq!(
        lines[2],
        format!("{}/about;About;;{}/;;1", base_url, base_url)
    );
}

#[tokio::test]
async fn test_page_budget_limits_requests() {
    let mock_server = MockServer::start().await;
    let anchors: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p</a>"#, i))
        .collect();
    mount_page(&mock_server, "/", &anchors).await;

    Mock::given(method("GET"))
        .respond_with(html("<p>leaf</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(2, 3)
        .crawl_config(&mock_server.uri())
        .unwrap();
    let outcome = run_crawl(config).await.unwrap();

    assert_eq!(outcome.pages.len(), 3);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/2.0"))
        .respond_with(html("<h1>Hello bot</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(1, 10)
        .crawl_config(&mock_server.uri())
        .unwrap();
    let outcome = Coordinator::new(config).unwrap().run().await;

    assert_eq!(outcome.pages.len(), 1);
    assert_eq!(outcome.pages[0].heading.as_deref(), Some("Hello bot"));
}

#[tokio::test]
async fn test_fetch_url_classifies_responses() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/ok", "<h1>ok</h1>").await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "image/png"))
        .mount(&mock_server)
        .await;

    let client = build_http_client("TestBot/2.0", Duration::from_secs(5)).unwrap();

    let body = fetch_url(&client, &format!("{}/ok", base_url)).await.unwrap();
    assert_eq!(body, "<h1>ok</h1>");

    let err = fetch_url(&client, &format!("{}/error", base_url))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus { status: 500, .. }));

    let err = fetch_url(&client, &format!("{}/image", base_url))
        .await
        .unwrap_err();
    match err {
        FetchError::ContentType { content_type, .. } => assert_eq!(content_type, "image/png"),
        other => panic!("expected content-type error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_url_transport_error() {
    let client = build_http_client("TestBot/2.0", Duration::from_secs(2)).unwrap();

    // Nothing listens on port 1
    let err = fetch_url(&client, "http://127.0.0.1:1/").await.unwrap_err();
    match err {
        FetchError::Transport { url, .. } => assert_eq!(url, "http://127.0.0.1:1/"),
        other => panic!("expected transport error, got {:?}", other),
    }
}
