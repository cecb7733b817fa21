//! HTML link extraction
//!
//! This module pulls raw href values out of an HTML document. It performs no
//! resolution or filtering; that is the job of the [`UrlFilter`](crate::url::UrlFilter).

use scraper::{Html, Selector};

/// Extracts every candidate link href from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>` (file downloads, not pages)
/// - stylesheets, scripts and images (never selected)
///
/// Hrefs are returned verbatim, in document order, duplicates included.
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::extract_links;
///
/// let html = r##"<html><body><a href="/page">Link</a><a href="#top">Top</a></body></html>"##;
/// assert_eq!(extract_links(html), vec!["/page", "#top"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}
