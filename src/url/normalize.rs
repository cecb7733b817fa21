use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes the crawler is willing to fetch
const CRAWLABLE_SCHEMES: &[&str] = &["http", "https"];

/// Returns true if the URL uses a scheme the crawler can fetch
pub fn is_crawlable_scheme(url: &Url) -> bool {
    CRAWLABLE_SCHEMES.contains(&url.scheme())
}

/// Parses and validates the root URL of a crawl
///
/// # Validation Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an `http` or `https` scheme
/// 3. Require a host
/// 4. Drop the fragment so the root uses the same key format as every
///    other discovered URL
///
/// # Arguments
///
/// * `root` - The root URL string supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The normalized root URL
/// * `Err(UrlError)` - The URL cannot anchor a crawl
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::parse_root;
///
/// let root = parse_root("https://EXAMPLE.com#intro").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/");
/// ```
pub fn parse_root(root: &str) -> UrlResult<Url> {
    let url = Url::parse(root.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_crawlable_scheme(&url) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(normalize_url(url))
}

/// Resolves an href against the page it was found on
///
/// Resolution follows the WHATWG URL rules implemented by [`Url::join`]:
/// relative paths, dot segments, protocol-relative links and query-only
/// references are all handled there. The fragment of the result is removed.
///
/// # Arguments
///
/// * `base` - The final URL of the page the href was found on
/// * `href` - The raw href attribute value
///
/// # Returns
///
/// * `Ok(Url)` - The absolute, normalized URL
/// * `Err(UrlError)` - The href could not be resolved
pub fn resolve_href(base: &Url, href: &str) -> UrlResult<Url> {
    base.join(href.trim())
        .map(normalize_url)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))
}

/// Normalizes an absolute URL into the dedup key format
///
/// Host lowercasing, default-port removal, percent-encoding and dot-segment
/// removal already happen at parse time; the only remaining step is dropping
/// the fragment, which never changes the fetched document.
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
