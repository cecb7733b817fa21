//! Output module for crawl results
//!
//! This module handles:
//! - The `UrlSet` result model and its Sitemaps XML serialization
//! - Crawl statistics collection and display

mod sitemap;
pub mod stats;

pub use sitemap::{write_sitemap, UrlEntry, UrlSet, SITEMAP_NAMESPACE};
pub use stats::{print_statistics, CrawlStats, RoundStats};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write XML: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
