//! HTML parser for extracting anchors and page text
//!
//! This module handles parsing HTML content to extract:
//! - Anchors with their text and surrounding context
//! - Page title
//! - Visible body text for record extraction

use crate::crawler::traits::PageLink;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use url::Url;

/// Maximum characters of enclosing-block text kept per anchor
pub const MAX_CONTEXT_CHARS: usize = 200;

/// Elements whose text is treated as an anchor's context
const CONTEXT_ELEMENTS: &[&str] = &["div", "section", "article", "li"];

/// Elements whose text is never part of the visible page text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Anchors found on the page, unique by absolute URL
    pub links: Vec<PageLink>,
}

/// Parses HTML content and extracts anchors and the title
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags with non-empty text
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only links
///
/// When the same URL appears more than once, the anchor with longer text or
/// context wins.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Example
///
/// ```no_run
/// use gleaner::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Jobs</title></head><body><a href="/jobs/1">Engineer</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Jobs".to_string()));
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Extracts all usable anchors from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<PageLink> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut order: Vec<String> = Vec::new();
    let mut by_href: HashMap<String, PageLink> = HashMap::new();

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        let anchor_text = collapse_whitespace(&element.text().collect::<String>());
        if anchor_text.is_empty() {
            continue;
        }

        let link = PageLink {
            href: href.clone(),
            anchor_text,
            context: enclosing_context(&element),
        };

        let keep = match by_href.get(&href) {
            None => {
                order.push(href.clone());
                true
            }
            Some(existing) => {
                link.anchor_text.len() > existing.anchor_text.len()
                    || link.context.len() > existing.context.len()
            }
        };
        if keep {
            by_href.insert(href, link);
        }
    }

    order
        .into_iter()
        .filter_map(|href| by_href.remove(&href))
        .collect()
}

/// Text of the nearest enclosing block element, truncated
fn enclosing_context(element: &ElementRef) -> String {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| CONTEXT_ELEMENTS.contains(&ancestor.value().name()))
        .map(|block| {
            let text = collapse_whitespace(&block.text().collect::<String>());
            truncate_chars(&text, MAX_CONTEXT_CHARS)
        })
        .unwrap_or_default()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Extracts visible body text, whitespace-normalised and truncated
///
/// Text inside script, style and similar elements is skipped.
///
/// # Arguments
///
/// * `html` - The HTML content
/// * `max_chars` - Maximum number of characters returned
pub fn extract_page_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut pieces: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            pieces.push(&**text);
        }
    }

    let text = collapse_whitespace(&pieces.join(" "));
    truncate_chars(&text, max_chars)
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
