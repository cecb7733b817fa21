//! URL handling module for Sumi-Sitemap
//!
//! This module provides root URL validation, link resolution and
//! normalization, host comparison, and the pluggable link filter.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_host};
pub use filter::{DefaultFilter, UrlFilter};
pub use normalize::{is_crawlable_scheme, normalize_url, parse_root, resolve_href};
