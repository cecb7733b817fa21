//! Link filtering policy
//!
//! A filter decides whether a raw href found on a page belongs in the crawl,
//! and if so returns its normalized absolute form.

use crate::url::{is_crawlable_scheme, resolve_href, same_host};
use url::Url;

/// Decides which discovered links are part of the crawl
///
/// Implementations must be pure: the same inputs always produce the same
/// answer, and no state is shared between calls. Workers call the filter
/// concurrently.
///
/// Any `Fn(&Url, &Url, &str) -> Option<Url> + Send + Sync` closure is a filter.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sumi_sitemap::url::{DefaultFilter, UrlFilter};
/// use sumi_sitemap::CrawlOptions;
/// use url::Url;
///
/// // Skip anything under /private on top of the default rules
/// let no_private = |root: &Url, base: &Url, href: &str| {
///     DefaultFilter
///         .filter(root, base, href)
///         .filter(|u| !u.path().starts_with("/private"))
/// };
/// let options = CrawlOptions::default().with_filter(Arc::new(no_private));
/// ```
pub trait UrlFilter: Send + Sync {
    /// Returns the normalized URL if `href` should be crawled
    ///
    /// * `root` - The crawl root; its host bounds the crawl
    /// * `base` - The final URL of the page the href was found on
    /// * `href` - The raw href attribute value
    fn filter(&self, root: &Url, base: &Url, href: &str) -> Option<Url>;
}

impl<F> UrlFilter for F
where
    F: Fn(&Url, &Url, &str) -> Option<Url> + Send + Sync,
{
    fn filter(&self, root: &Url, base: &Url, href: &str) -> Option<Url> {
        self(root, base, href)
    }
}

/// The standard same-host filter
///
/// # Rules
///
/// **Reject:**
/// - empty hrefs and fragment-only hrefs (`#top`)
/// - hrefs that fail to resolve against the page URL
/// - anything that does not resolve to `http` or `https`
///   (`mailto:`, `javascript:`, `tel:`, `data:` ...)
/// - URLs whose host differs from the root's host
///
/// **Accept:** everything else, with the fragment removed.
///
/// The host check is anchored to the root, not to the page: a page reached
/// through a redirect to another host cannot widen the crawl.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilter;

impl UrlFilter for DefaultFilter {
    fn filter(&self, root: &Url, base: &Url, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let resolved = match resolve_href(base, href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping malformed link on {}: {}", base, e);
                return None;
            }
        };

        if !is_crawlable_scheme(&resolved) || !same_host(root, &resolved) {
            return None;
        }

        Some(resolved)
    }
}
