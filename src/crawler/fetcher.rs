//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent, timeout and redirect policy
//! - GET requests that follow redirects and report the final URL
//! - Status validation (anything outside 2xx is an error)
//! - Error classification

use crate::crawler::parser::extract_links;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirects followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Why a single page could not contribute links
///
/// All variants are recoverable for every page but the root.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against it
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Raw hrefs found in the body
    pub hrefs: Vec<String>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value
/// * `timeout` - Per-request timeout, also used as the connect timeout
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_sitemap::crawler::build_http_client;
///
/// let client = build_http_client("sumi-sitemap/1.0", Duration::from_secs(3)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and extracts its raw hrefs
///
/// # Request Flow
///
/// 1. Send GET request (redirects followed, max 10 hops)
/// 2. Non-2xx status → `FetchError::Status`
/// 3. Non-HTML Content-Type → success with no hrefs, body not read
/// 4. Read body and extract hrefs
///
/// The response is consumed or dropped on every path, which returns the
/// connection to the pool.
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx, HTML | `Ok` with hrefs |
/// | HTTP 2xx, other content | `Ok` with no hrefs |
/// | HTTP 3xx (redirect limit hit), 4xx, 5xx | `Status` / `Transport` |
/// | Timeout | `Timeout` |
/// | Connection refused, DNS failure | `Connect` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if !is_html(content_type.as_deref()) {
        tracing::debug!(
            "Not following links on {} (content type {:?})",
            final_url,
            content_type
        );
        return Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            hrefs: Vec::new(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        hrefs: extract_links(&body),
    })
}

/// Returns true if the Content-Type may carry HTML links
///
/// A missing header is treated as HTML.
fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => {
            let value = value.to_ascii_lowercase();
            value.contains("text/html") || value.contains("application/xhtml+xml")
        }
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}
