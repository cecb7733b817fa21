//! Crawler module for breadth-first site discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and failure classification
//! - HTML parsing and link extraction
//! - The concurrent worker pool that processes one round
//! - Round-by-round crawl coordination

mod context;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pool;

pub use context::{
    default_user_agent, CrawlContext, CrawlOptions, DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT,
};
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage};
pub use frontier::SeenSet;
pub use parser::extract_links;
pub use pool::{process_page, PageLinks, PageOutcome, WorkerPool};

use crate::output::UrlSet;
use crate::SitemapError;

/// Builds the sitemap URL set for a site
///
/// This is the main entry point for a crawl. It will:
/// 1. Validate the root URL and options
/// 2. Build the HTTP client
/// 3. Fetch pages round by round up to `max_depth`
/// 4. Return every discovered same-host URL in discovery order
///
/// # Arguments
///
/// * `root` - The absolute http(s) URL to start from
/// * `options` - Depth, concurrency, timeout and filter settings
///
/// # Returns
///
/// * `Ok(UrlSet)` - The root plus every URL discovered within the depth limit
/// * `Err(SitemapError)` - Invalid input or the root could not be fetched
pub async fn build_sitemap(root: &str, options: CrawlOptions) -> Result<UrlSet, SitemapError> {
    run_crawl(root, options).await
}
