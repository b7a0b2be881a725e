use url::Url;

/// Query parameters that only carry tracking or session state
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
    "ref",
    "source",
    "campaign",
    "sessionid",
    "jsessionid",
    "phpsessid",
    "_ga",
    "_gid",
];

/// Canonicalizes a URL so that equivalent URLs compare equal
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; if it does not parse, return the input unchanged
/// 2. Lowercase the host
/// 3. Remove the fragment
/// 4. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`, session ids, ...)
/// 5. Remove an empty query string
/// 6. Remove a single trailing slash from the path, unless the path is the root
///
/// Remaining query parameters keep their original order. This is a best-effort
/// normalization, not a validator: it never fails.
///
/// # Examples
///
/// ```
/// use gleaner::url::canonicalize;
///
/// assert_eq!(
///     canonicalize("https://EXAMPLE.com/jobs/42/?utm_source=x#frag"),
///     "https://example.com/jobs/42"
/// );
/// assert_eq!(canonicalize("not a url"), "not a url");
/// ```
pub fn canonicalize(url_str: &str) -> String {
    let mut url = match Url::parse(url_str) {
        Ok(url) => url,
        Err(_) => return url_str.to_string(),
    };

    if let Some(host) = url.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host && url.set_host(Some(&lowered)).is_err() {
            return url_str.to_string();
        }
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    url.to_string()
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}
