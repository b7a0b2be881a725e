//! Candidate link validation
//!
//! Decides which links discovered on a page are worth adding to the frontier.

use crate::url::normalize::canonicalize;
use regex::RegexSet;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Links with more characters than this are treated as junk
pub const MAX_LINK_LENGTH: usize = 500;

/// Links matching any of these never lead to a record
const EXCLUDE_PATTERNS: &[&str] = &[
    // File downloads
    r"\.pdf$",
    r"\.doc$",
    r"\.zip$",
    r"\.exe$",
    // API and admin endpoints
    r"/api/",
    r"/ajax/",
    r"/wp-admin/",
    r"/admin/",
    // Non-HTTP pseudo-schemes
    r"javascript:",
    r"mailto:",
    r"tel:",
    r"ftp:",
    // Print views and empty anchors
    r"#$",
    r"\?print=",
    r"/print/",
];

fn exclude_patterns() -> &'static RegexSet {
    static PATTERNS: OnceLock<RegexSet> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        RegexSet::new(EXCLUDE_PATTERNS.iter().map(|p| format!("(?i){}", p)))
            .expect("exclusion patterns are valid regexes")
    })
}

/// Why a candidate link was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    NotHttp,
    Unparseable,
    AlreadyVisited,
    AlreadyQueued,
    CurrentPage,
    DuplicateInBatch,
    ExternalDomain,
    TooLong,
    Excluded,
}

/// Filters candidate links down to the ones worth visiting
///
/// `visited` and `queued` hold canonical forms (see [`canonicalize`]);
/// `domain` is the lowercase host the run is restricted to.
///
/// A candidate is dropped when it is empty, not http(s), has no host, is
/// already visited or queued, is the current page, repeats an earlier
/// candidate of the same batch, lives on another host, is longer than
/// [`MAX_LINK_LENGTH`], or matches an exclusion pattern. Survivors keep their
/// original spelling and relative order.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use gleaner::url::filter_links;
///
/// let links = vec![
///     "https://EXAMPLE.com/jobs/42/?utm_source=x#frag".to_string(),
///     "https://example.com/jobs/42".to_string(),
///     "https://other.com/jobs/1".to_string(),
///     "mailto:hr@example.com".to_string(),
/// ];
/// let kept = filter_links(
///     &links,
///     "https://example.com/",
///     &HashSet::new(),
///     &HashSet::new(),
///     "example.com",
/// );
/// assert_eq!(kept, vec!["https://EXAMPLE.com/jobs/42/?utm_source=x#frag".to_string()]);
/// ```
pub fn filter_links<S: AsRef<str>>(
    candidates: &[S],
    current_url: &str,
    visited: &HashSet<String>,
    queued: &HashSet<String>,
    domain: &str,
) -> Vec<String> {
    let current = canonicalize(current_url);
    let domain = domain.to_lowercase();
    let mut seen: HashSet<String> = HashSet::new();
    let mut valid = Vec::new();

    for candidate in candidates {
        let link = candidate.as_ref();
        match check_link(link, &current, visited, queued, &seen, &domain) {
            Ok(canonical) => {
                seen.insert(canonical);
                valid.push(link.to_string());
            }
            Err(reason) => {
                tracing::debug!("Rejected link {:?}: {:?}", link, reason);
            }
        }
    }

    tracing::debug!(
        "Validated {} unique links from {} candidates",
        valid.len(),
        candidates.len()
    );

    valid
}

/// Runs every check against one candidate, returning its canonical form on success
fn check_link(
    link: &str,
    current: &str,
    visited: &HashSet<String>,
    queued: &HashSet<String>,
    seen: &HashSet<String>,
    domain: &str,
) -> Result<String, Rejection> {
    if link.trim().is_empty() {
        return Err(Rejection::Empty);
    }

    let lowered = link.to_ascii_lowercase();
    if !lowered.starts_with("http://") && !lowered.starts_with("https://") {
        return Err(Rejection::NotHttp);
    }

    let parsed = Url::parse(link).map_err(|_| Rejection::Unparseable)?;
    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(Rejection::Unparseable)?
        .to_lowercase();

    let canonical = canonicalize(link);

    if visited.contains(&canonical) {
        return Err(Rejection::AlreadyVisited);
    }

    if queued.contains(&canonical) {
        return Err(Rejection::AlreadyQueued);
    }

    if seen.contains(&canonical) {
        return Err(Rejection::DuplicateInBatch);
    }

    if canonical == current {
        return Err(Rejection::CurrentPage);
    }

    if host != domain {
        return Err(Rejection::ExternalDomain);
    }

    if link.chars().count() > MAX_LINK_LENGTH {
        return Err(Rejection::TooLong);
    }

    if exclude_patterns().is_match(link) {
        return Err(Rejection::Excluded);
    }

    Ok(canonical)
}
