//! URL handling module for Gleaner
//!
//! This module provides URL canonicalization, domain extraction, candidate
//! link filtering and the path heuristics used to spot detail and listing pages.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{domain_of, extract_domain};
pub use filter::{filter_links, Rejection, MAX_LINK_LENGTH};
pub use normalize::canonicalize;

use url::Url;

/// Path markers of pages that hold a single record
const DETAIL_MARKERS: &[&str] = &[
    "/job/",
    "/jobs/",
    "/career/",
    "/careers/",
    "/position/",
    "/opening/",
    "/listings/",
];

/// Path and query markers of pages that list many records
const LISTING_MARKERS: &[&str] = &[
    "/search",
    "/category",
    "/categories/",
    "/remote-",
    "?page=",
    "&page=",
    "/page/",
];

/// Returns true if the URL path looks like a detail page
///
/// Only the path is inspected; unparseable input is matched as a whole.
///
/// # Examples
///
/// ```
/// use gleaner::url::is_detail_url;
///
/// assert!(is_detail_url("https://example.com/jobs/42"));
/// assert!(is_detail_url("https://example.com/Careers/backend-engineer"));
/// assert!(!is_detail_url("https://example.com/jobs"));
/// assert!(!is_detail_url("https://example.com/about"));
/// ```
pub fn is_detail_url(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    };
    DETAIL_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Returns true if the URL looks like a listing or pagination page
///
/// Detail pages never count as listings.
pub fn is_listing_url(url: &str) -> bool {
    if is_detail_url(url) {
        return false;
    }
    let lowered = url.to_lowercase();
    LISTING_MARKERS.iter().any(|marker| lowered.contains(marker))
}
