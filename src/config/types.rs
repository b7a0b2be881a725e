use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to crawl and what to look for
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Starting URL; its host is the only domain the run will visit
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Free-text description of a matching record
    pub goal: String,

    /// Number of records after which the run stops
    #[serde(rename = "max-records", default = "default_max_records")]
    pub max_records: usize,

    /// Wall-clock limit for the whole run in seconds (0 disables it)
    #[serde(rename = "max-run-seconds", default)]
    pub max_run_seconds: u64,
}

impl RunConfig {
    /// Returns the wall-clock limit, if one is configured
    pub fn max_run_time(&self) -> Option<Duration> {
        (self.max_run_seconds > 0).then(|| Duration::from_secs(self.max_run_seconds))
    }
}

/// Budget and politeness limits for a run
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    /// Minimum time between the start of two network operations (milliseconds)
    #[serde(rename = "min-request-interval-ms", default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Attempts per operation before it is abandoned
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Recorded errors after which the run stops
    #[serde(rename = "max-errors", default = "default_max_errors")]
    pub max_errors: u32,

    /// How many queued URLs the controller inspects for a detail page
    #[serde(rename = "detail-lookahead", default = "default_detail_lookahead")]
    pub detail_lookahead: usize,

    /// Maximum navigation links enqueued per discovered page
    #[serde(rename = "navigation-cap", default = "default_navigation_cap")]
    pub navigation_cap: usize,
}

impl BudgetConfig {
    /// Returns the minimum request interval as a duration
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            min_request_interval_ms: default_min_request_interval_ms(),
            max_retries: default_max_retries(),
            max_errors: default_max_errors(),
            detail_lookahead: default_detail_lookahead(),
            navigation_cap: default_navigation_cap(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Gleaner".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/gleaner-rs/gleaner".to_string(),
        }
    }
}

/// Language model endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(rename = "base-url", default = "default_llm_base_url")]
    pub base_url: String,

    /// Chat model used for categorization and extraction
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Maximum characters of page text sent to the extractor
    #[serde(rename = "page-text-limit", default = "default_page_text_limit")]
    pub page_text_limit: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_llm_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key_env: default_api_key_env(),
            page_text_limit: default_page_text_limit(),
            timeout_seconds: default_llm_timeout_seconds(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON file receiving extracted records
    #[serde(rename = "records-path", default = "default_records_path")]
    pub records_path: String,

    /// Path of the markdown run summary
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            summary_path: default_summary_path(),
        }
    }
}

fn default_max_records() -> usize {
    5
}

fn default_min_request_interval_ms() -> u64 {
    2000
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_errors() -> u32 {
    10
}

fn default_detail_lookahead() -> usize {
    5
}

fn default_navigation_cap() -> usize {
    3
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_page_text_limit() -> usize {
    12_000
}

fn default_llm_timeout_seconds() -> u64 {
    60
}

fn default_records_path() -> String {
    "./records.json".to_string()
}

fn default_summary_path() -> String {
    "./summary.md".to_string()
}
