use crate::crawler::CrawlOptions;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Sitemap
///
/// Every section and key is optional; missing values fall back to the
/// [`CrawlOptions`] defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlerConfig {
    /// Root URL to start crawling from
    #[serde(rename = "root-url")]
    pub root_url: Option<String>,

    /// Number of rounds to crawl from the root
    #[serde(rename = "max-depth")]
    pub max_depth: Option<u32>,

    /// Number of concurrent page fetches
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: Option<String>,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to write the sitemap XML to; stdout when unset
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `CrawlerName/Version`
    ///
    /// Returns None when no crawler name is configured.
    pub fn header_value(&self) -> Option<String> {
        let name = self.crawler_name.as_deref()?;
        let version = self
            .crawler_version
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_VERSION"));
        Some(format!("{}/{}", name, version))
    }
}

impl Config {
    /// Converts the file configuration into crawl options
    pub fn to_options(&self) -> CrawlOptions {
        let mut options = CrawlOptions::default();

        if let Some(depth) = self.crawler.max_depth {
            options = options.with_max_depth(depth);
        }
        if let Some(concurrency) = self.crawler.concurrency {
            options = options.with_concurrency(concurrency);
        }
        if let Some(secs) = self.crawler.timeout_secs {
            options = options.with_timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = self.user_agent.header_value() {
            options = options.with_user_agent(user_agent);
        }

        options
    }
}
