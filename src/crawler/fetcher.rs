//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Content-Type checks
//! - Error classification into collaborator errors
//!
//! Retries are not handled here; every call is wrapped by the retry executor.

use crate::config::UserAgentConfig;
use crate::crawler::parser::{extract_page_text, parse_html};
use crate::crawler::traits::{PageCollector, PageLink};
use crate::url::domain_of;
use crate::{CollaboratorError, CollaboratorResult};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use gleaner::config::UserAgentConfig;
/// use gleaner::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns whether a Content-Type header value denotes an HTML document
///
/// A missing header is accepted.
pub fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.is_empty()
        || content_type.starts_with("text/html")
        || content_type.starts_with("application/xhtml+xml")
}

/// Fetches an HTML page
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Network failure, timeout, redirect loop | `Http` |
/// | Non-success status | `Status` |
/// | Non-HTML Content-Type | `ContentMismatch` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_html(client: &Client, url: &str) -> CollaboratorResult<FetchedPage> {
    let http_error = |source| CollaboratorError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(CollaboratorError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !is_html_content_type(&content_type) {
        return Err(CollaboratorError::ContentMismatch {
            url: url.to_string(),
            content_type,
        });
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(http_error)?;
    tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

/// Page collector backed by reqwest and scraper
#[derive(Debug, Clone)]
pub struct HttpPageCollector {
    client: Client,
}

impl HttpPageCollector {
    /// Creates a collector with its own HTTP client
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a collector around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a page and returns its visible text
    ///
    /// # Arguments
    ///
    /// * `url` - The page to fetch
    /// * `max_chars` - Maximum number of characters returned
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Whitespace-normalised body text
    /// * `Err(CollaboratorError)` - Fetch failed or the page has no text
    pub async fn fetch_text(&self, url: &str, max_chars: usize) -> CollaboratorResult<String> {
        let page = fetch_html(&self.client, url).await?;
        let text = extract_page_text(&page.body, max_chars);
        if text.is_empty() {
            return Err(CollaboratorError::EmptyContent(url.to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl PageCollector for HttpPageCollector {
    async fn collect_links(&self, url: &str) -> CollaboratorResult<Vec<PageLink>> {
        let page = fetch_html(&self.client, url).await?;
        let parsed = parse_html(&page.body, &page.final_url);

        let Some(domain) = domain_of(url) else {
            return Ok(Vec::new());
        };

        let total = parsed.links.len();
        let links: Vec<PageLink> = parsed
            .links
            .into_iter()
            .filter(|link| domain_of(&link.href).as_deref() == Some(domain.as_str()))
            .collect();

        tracing::debug!(
            "Kept {} of {} links on {} after same-domain filter",
            links.len(),
            total,
            url
        );
        Ok(links)
    }
}
