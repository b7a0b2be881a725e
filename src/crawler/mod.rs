//! Crawler module for the run control loop and its collaborators
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HTML parsing
//! - The rate-limited retry executor
//! - The step controller
//! - Overall crawl coordination

mod controller;
mod coordinator;
mod executor;
mod fetcher;
mod parser;
mod traits;

pub use controller::{
    decide, has_detail_in_lookahead, origin_pending, termination_reasons, Action, TerminationReason,
};
pub use coordinator::{Coordinator, CrawlReport};
pub use executor::RetryExecutor;
pub use fetcher::{build_http_client, fetch_html, is_html_content_type, FetchedPage, HttpPageCollector};
pub use parser::{collapse_whitespace, extract_page_text, parse_html, truncate_chars, ParsedPage};
pub use traits::{
    discover, LinkCategories, LinkCategorizer, PageCollector, PageLink, RecordExtractor,
};

use crate::config::Config;
use crate::GleanError;

/// Runs a complete crawl with the default collaborators
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `api_key` - Key for the language model endpoint
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished
/// * `Err(GleanError)` - The run could not be set up
pub async fn crawl(config: &Config, api_key: &str) -> Result<CrawlReport, GleanError> {
    let coordinator = Coordinator::from_config(config, api_key, false)?;
    Ok(coordinator.run().await)
}
