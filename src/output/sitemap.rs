//! Sitemap result model and XML serialization
//!
//! See the Sitemaps XML protocol at <https://www.sitemaps.org/protocol.html>.

use crate::output::{OutputError, OutputResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::Path;

/// Namespace of the `urlset` root element
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` entry of a sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry {
    /// Absolute URL of the page
    pub loc: String,
}

/// The crawl result: a deduplicated, ordered list of page URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSet {
    pub entries: Vec<UrlEntry>,
}

impl UrlSet {
    /// Builds a URL set from already-deduplicated URLs, keeping their order
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: urls
                .into_iter()
                .map(|loc| UrlEntry { loc: loc.into() })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.loc == url)
    }

    /// Iterates over the entry URLs
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.loc.as_str())
    }

    /// Serializes the set as a Sitemaps XML document
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_sitemap::UrlSet;
    ///
    /// let set = UrlSet::from_urls(["https://example.com/"]);
    /// let xml = set.to_xml().unwrap();
    /// assert!(xml.contains("<loc>https://example.com/</loc>"));
    /// ```
    pub fn to_xml(&self) -> OutputResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
        writer
            .write_event(Event::Start(urlset))
            .map_err(xml_error)?;

        for entry in &self.entries {
            writer
                .write_event(Event::Start(BytesStart::new("url")))
                .map_err(xml_error)?;
            writer
                .write_event(Event::Start(BytesStart::new("loc")))
                .map_err(xml_error)?;
            writer
                .write_event(Event::Text(BytesText::new(&entry.loc)))
                .map_err(xml_error)?;
            writer
                .write_event(Event::End(BytesEnd::new("loc")))
                .map_err(xml_error)?;
            writer
                .write_event(Event::End(BytesEnd::new("url")))
                .map_err(xml_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("urlset")))
            .map_err(xml_error)?;

        let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Writes the sitemap XML to `path`
pub fn write_sitemap(set: &UrlSet, path: &Path) -> OutputResult<()> {
    let xml = set.to_xml()?;
    std::fs::write(path, xml)?;
    Ok(())
}

fn xml_error<E: std::fmt::Display>(e: E) -> OutputError {
    OutputError::Xml(e.to_string())
}
