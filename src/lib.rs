//! Gleaner: a goal-directed record harvester
//!
//! This crate crawls a single website, alternating between discovering
//! candidate pages and extracting structured records from detail pages,
//! while staying inside a fixed budget and a polite request rate.

pub mod config;
pub mod crawler;
pub mod llm;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Gleaner operations
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),
}

/// Failures raised by the page collector, link categorizer and record extractor
///
/// These never escape a crawl run: the retry executor turns them into
/// retries and, once the retry budget is spent, into a recorded error.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("No usable content at {0}")]
    EmptyContent(String),

    #[error("Model request failed: {0}")]
    Model(String),

    #[error("Failed to decode model response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias for Gleaner operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for collaborator calls
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, TerminationReason};
pub use state::{Record, RunState};
pub use url::{canonicalize, filter_links, is_detail_url};
