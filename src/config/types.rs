use crate::config::validation::{validate, validate_limits, validate_seed_url};
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default number of pages fetched at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 3;

/// Default page budget
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default report file
pub const DEFAULT_REPORT_PATH: &str = "report.csv";

/// Main configuration structure for Sitewalk, as read from TOML
///
/// Every section and field is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Maximum number of distinct pages recorded
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Total time allowed for one request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "BootCrawler".to_string(),
            crawler_version: "1.0".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV report
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Path to the markdown summary, if one should be written
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: DEFAULT_REPORT_PATH.to_string(),
            summary_path: None,
        }
    }
}

impl Config {
    /// Builds the crawl configuration for a crawl seeded at `base_url`
    ///
    /// Validates the whole configuration first; any error here is fatal and
    /// happens before crawling starts.
    pub fn crawl_config(&self, base_url: &str) -> Result<CrawlConfig, ConfigError> {
        validate(self)?;

        Ok(CrawlConfig {
            base_url: validate_seed_url(base_url)?,
            max_concurrency: self.crawler.max_concurrency,
            max_pages: self.crawler.max_pages,
            request_timeout: Duration::from_secs(self.crawler.request_timeout_secs),
            user_agent: self.user_agent.header_value(),
        })
    }
}

/// Immutable settings for one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Seed URL; its hostname defines the site
    pub base_url: Url,

    /// Maximum number of units of work past admission at once
    pub max_concurrency: usize,

    /// Maximum number of distinct pages recorded
    pub max_pages: usize,

    /// Total time allowed for one request
    pub request_timeout: Duration,

    /// `User-Agent` header value
    pub user_agent: String,
}

impl CrawlConfig {
    /// Creates a validated crawl configuration with default timeout and user agent
    ///
    /// # Example
    ///
    /// ```
    /// use sitewalk::config::CrawlConfig;
    ///
    /// let config = CrawlConfig::new("https://example.com/", 5, 200).unwrap();
    /// assert_eq!(config.base_url.host_str(), Some("example.com"));
    /// assert!(CrawlConfig::new("https://example.com/", 0, 200).is_err());
    /// ```
    pub fn new(
        base_url: &str,
        max_concurrency: usize,
        max_pages: usize,
    ) -> Result<Self, ConfigError> {
        validate_limits(max_concurrency, max_pages)?;

        Ok(Self {
            base_url: validate_seed_url(base_url)?,
            max_concurrency,
            max_pages,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: UserAgentConfig::default().header_value(),
        })
    }
}
