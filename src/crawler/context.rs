//! Crawl options and the per-crawl root context

use crate::crawler::fetcher::build_http_client;
use crate::url::{parse_root, DefaultFilter, UrlFilter};
use crate::SitemapError;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Returns the default User-Agent string
pub fn default_user_agent() -> String {
    format!("sumi-sitemap/{}", env!("CARGO_PKG_VERSION"))
}

/// Caller-facing crawl options
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use sumi_sitemap::CrawlOptions;
///
/// let options = CrawlOptions::default()
///     .with_max_depth(2)
///     .with_concurrency(4)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(options.max_depth, 2);
/// ```
#[derive(Clone)]
pub struct CrawlOptions {
    /// Number of rounds to fetch; 0 returns only the root
    pub max_depth: u32,

    /// Number of concurrent fetch workers
    pub concurrency: usize,

    /// Per-request timeout
    pub timeout: Duration,

    /// Link filter; `DefaultFilter` when unset
    pub filter: Option<Arc<dyn UrlFilter>>,

    /// User-Agent header; `sumi-sitemap/<version>` when unset
    pub user_agent: Option<String>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: num_cpus::get(),
            timeout: DEFAULT_TIMEOUT,
            filter: None,
            user_agent: None,
        }
    }
}

impl fmt::Debug for CrawlOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlOptions")
            .field("max_depth", &self.max_depth)
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .field("custom_filter", &self.filter.is_some())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl CrawlOptions {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_filter(mut self, filter: Arc<dyn UrlFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Immutable configuration shared by every component of one crawl
///
/// Built once from the root URL and [`CrawlOptions`]; workers hold it behind
/// an `Arc`.
pub struct CrawlContext {
    pub root: Url,
    pub max_depth: u32,
    pub concurrency: usize,
    pub timeout: Duration,
    pub filter: Arc<dyn UrlFilter>,
    pub client: Client,
}

impl CrawlContext {
    /// Validates the root and options and builds the HTTP client
    ///
    /// # Errors
    ///
    /// * `SitemapError::Url` - root is malformed, not http(s), or has no host
    /// * `SitemapError::InvalidOptions` - concurrency or timeout is zero
    /// * `SitemapError::Client` - the HTTP client could not be built
    pub fn new(root: &str, options: CrawlOptions) -> Result<Self, SitemapError> {
        let root = parse_root(root)?;

        if options.concurrency == 0 {
            return Err(SitemapError::InvalidOptions(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if options.timeout.is_zero() {
            return Err(SitemapError::InvalidOptions(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let user_agent = options.user_agent.unwrap_or_else(default_user_agent);
        let client = build_http_client(&user_agent, options.timeout)?;

        Ok(Self {
            root,
            max_depth: options.max_depth,
            concurrency: options.concurrency,
            timeout: options.timeout,
            filter: options.filter.unwrap_or_else(|| Arc::new(DefaultFilter)),
            client,
        })
    }

    /// Runs the filter for an href found on the page at `base`
    pub fn accept(&self, base: &Url, href: &str) -> Option<Url> {
        self.filter.filter(&self.root, base, href)
    }
}

impl fmt::Debug for CrawlContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlContext")
            .field("root", &self.root.as_str())
            .field("max_depth", &self.max_depth)
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
