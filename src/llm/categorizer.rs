//! Link categorizers
//!
//! [`LlmLinkCategorizer`] asks the language model to sort anchors into
//! detail, listing and navigation links. [`HeuristicCategorizer`] does the
//! same from URL shapes alone and needs no network access.

use crate::crawler::{truncate_chars, LinkCategories, LinkCategorizer, PageLink};
use crate::llm::openai::OpenAiClient;
use crate::url::{is_detail_url, is_listing_url};
use crate::CollaboratorResult;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

/// Characters of anchor context included per link in the prompt
const PROMPT_CONTEXT_CHARS: usize = 100;

const SYSTEM_PROMPT: &str = "You categorize links found on a web page. \
Reply with a JSON object with the keys job_detail_links, job_listing_pages and \
navigation_links, each a list of URLs copied exactly from the input.";

/// Model reply shape
#[derive(Debug, Default, Deserialize)]
struct LinkCategorization {
    #[serde(default)]
    job_detail_links: Vec<String>,
    #[serde(default)]
    job_listing_pages: Vec<String>,
    #[serde(default)]
    navigation_links: Vec<String>,
}

/// Categorizer backed by a chat completion model
#[derive(Debug, Clone)]
pub struct LlmLinkCategorizer {
    client: Arc<OpenAiClient>,
}

impl LlmLinkCategorizer {
    pub fn new(client: Arc<OpenAiClient>) -> Self {
        Self { client }
    }
}

/// Builds the categorization prompt for a goal and a set of anchors
pub fn categorization_prompt(links: &[PageLink], goal: &str) -> String {
    let mut links_text = String::new();
    for link in links {
        let _ = writeln!(
            links_text,
            "URL: {}\nText: {}\nContext: {}\n---",
            link.href,
            link.anchor_text,
            truncate_chars(&link.context, PROMPT_CONTEXT_CHARS)
        );
    }

    format!(
        "User is looking for: {goal}\n\n\
         Available links:\n{links_text}\n\
         Categorize these links into:\n\
         1. job_detail_links: direct links to individual postings (IDs or specific positions in the URL)\n\
         2. job_listing_pages: pages listing several postings (search results, category pages)\n\
         3. navigation_links: pagination, search, filter or navigation links that might lead to more postings\n\n\
         Focus on links most relevant to what the user is looking for.\n\
         Return empty lists if no relevant links are found."
    )
}

/// Drops URLs that were not in the input and repeats across categories
fn retain_known(categorization: LinkCategorization, links: &[PageLink]) -> LinkCategories {
    let known: HashSet<&str> = links.iter().map(|l| l.href.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = |urls: Vec<String>| -> Vec<String> {
        urls.into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| known.contains(url.as_str()) && seen.insert(url.clone()))
            .collect()
    };

    let detail = keep(categorization.job_detail_links);
    let listing = keep(categorization.job_listing_pages);
    let navigation = keep(categorization.navigation_links);
    LinkCategories {
        detail,
        listing,
        navigation,
    }
}

#[async_trait]
impl LinkCategorizer for LlmLinkCategorizer {
    async fn categorize(&self, links: &[PageLink], goal: &str) -> CollaboratorResult<LinkCategories> {
        let prompt = categorization_prompt(links, goal);
        let reply: LinkCategorization = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;

        let returned =
            reply.job_detail_links.len() + reply.job_listing_pages.len() + reply.navigation_links.len();
        let categories = retain_known(reply, links);
        if categories.total() < returned {
            tracing::debug!(
                "Dropped {} categorized links not present on the page",
                returned - categories.total()
            );
        }
        Ok(categories)
    }
}

/// Categorizer that sorts links by URL shape
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicCategorizer;

impl HeuristicCategorizer {
    pub fn new() -> Self {
        Self
    }

    /// Sorts links without any I/O
    pub fn categorize_links(&self, links: &[PageLink]) -> LinkCategories {
        let mut categories = LinkCategories::default();
        for link in links {
            let href = link.href.clone();
            if is_detail_url(&href) {
                categories.detail.push(href);
            } else if is_listing_url(&href) {
                categories.listing.push(href);
            } else {
                categories.navigation.push(href);
            }
        }
        categories
    }
}

#[async_trait]
impl LinkCategorizer for HeuristicCategorizer {
    async fn categorize(&self, links: &[PageLink], _goal: &str) -> CollaboratorResult<LinkCategories> {
        Ok(self.categorize_links(links))
    }
}
