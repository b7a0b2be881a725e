//! Collaborator interfaces used by the coordinator
//!
//! The coordinator never talks to the network directly. Pages are collected
//! through a `PageCollector`, links are sorted by a `LinkCategorizer` and
//! records are produced by a `RecordExtractor`.

use crate::state::Record;
use crate::CollaboratorResult;
use async_trait::async_trait;

/// An anchor found on a collected page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute http(s) URL
    pub href: String,

    /// Whitespace-collapsed anchor text, never empty
    pub anchor_text: String,

    /// Text of the nearest enclosing block, truncated
    pub context: String,
}

impl PageLink {
    pub fn new(
        href: impl Into<String>,
        anchor_text: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            href: href.into(),
            anchor_text: anchor_text.into(),
            context: context.into(),
        }
    }
}

/// Links of a page sorted by how promising they are
///
/// The split only drives insertion order into the frontier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCategories {
    /// Pages that most likely hold a single record
    pub detail: Vec<String>,

    /// Pages that list several records
    pub listing: Vec<String>,

    /// Other in-site navigation
    pub navigation: Vec<String>,
}

impl LinkCategories {
    /// Total number of categorized links
    pub fn total(&self) -> usize {
        self.detail.len() + self.listing.len() + self.navigation.len()
    }
}

/// Fetches a page and returns its anchors
#[async_trait]
pub trait PageCollector: Send + Sync {
    async fn collect_links(&self, url: &str) -> CollaboratorResult<Vec<PageLink>>;
}

/// Sorts collected links with respect to a goal
#[async_trait]
pub trait LinkCategorizer: Send + Sync {
    async fn categorize(&self, links: &[PageLink], goal: &str) -> CollaboratorResult<LinkCategories>;
}

/// Produces a record from a detail page
///
/// The returned record's `source_url` equals `url`.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    async fn extract(&self, url: &str, goal: &str) -> CollaboratorResult<Record>;
}

/// Collects a page and categorizes its links as one operation
pub async fn discover(
    collector: &dyn PageCollector,
    categorizer: &dyn LinkCategorizer,
    url: &str,
    goal: &str,
) -> CollaboratorResult<LinkCategories> {
    let links = collector.collect_links(url).await?;
    tracing::info!("Found {} links on {}", links.len(), url);

    if links.is_empty() {
        return Ok(LinkCategories::default());
    }

    let categories = categorizer.categorize(&links, goal).await?;
    tracing::info!(
        "Categorized links: {} detail, {} listing, {} navigation",
        categories.detail.len(),
        categories.listing.len(),
        categories.navigation.len()
    );
    Ok(categories)
}
