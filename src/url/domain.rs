use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `candidate` lives on the same host as `root`
///
/// Hosts are compared case-insensitively together with any explicit port.
/// Default ports are dropped at parse time, so `http://example.com/` and
/// `https://example.com/` share a host while `http://example.com:8080/`
/// does not.
pub fn same_host(root: &Url, candidate: &Url) -> bool {
    match (extract_domain(root), extract_domain(candidate)) {
        (Some(a), Some(b)) => a == b && root.port() == candidate.port(),
        _ => false,
    }
}
