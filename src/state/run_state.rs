//! The aggregate mutable context of one crawl run
//!
//! A `RunState` is created at the start of a run, owned exclusively by the
//! coordinator's control loop, and discarded when the run ends.

use crate::config::{BudgetConfig, Config};
use crate::state::frontier::Frontier;
use crate::state::record::Record;
use crate::state::record_store::RecordStore;
use crate::url::extract_domain;
use crate::{ConfigError, GleanError};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Immutable limits of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    /// Records after which the run is complete
    pub max_records: usize,

    /// Recorded errors after which the run is complete
    pub max_errors: u32,

    /// Attempts per network operation
    pub max_retries: u32,

    /// Minimum time between the start of two network operations
    pub min_request_interval: Duration,

    /// Queued URLs inspected when looking for a detail page
    pub detail_lookahead: usize,

    /// Navigation links enqueued per discovered page
    pub navigation_cap: usize,
}

impl Budget {
    /// Builds a budget from the budget section plus a record limit
    pub fn from_config(budget: &BudgetConfig, max_records: usize) -> Self {
        Self {
            max_records,
            max_errors: budget.max_errors,
            max_retries: budget.max_retries,
            min_request_interval: budget.min_request_interval(),
            detail_lookahead: budget.detail_lookahead,
            navigation_cap: budget.navigation_cap,
        }
    }

    /// Sets the record limit
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    /// Sets the error ceiling
    pub fn with_max_errors(mut self, max_errors: u32) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Sets the attempts per operation
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the politeness interval
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::from_config(&BudgetConfig::default(), 5)
    }
}

/// Starting point of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// The start URL as configured
    pub url: String,

    /// Lowercase host every visited URL must share
    pub domain: String,
}

impl Origin {
    /// Parses the start URL and extracts its domain
    pub fn parse(start_url: &str) -> Result<Self, GleanError> {
        let parsed = Url::parse(start_url)?;
        let domain = extract_domain(&parsed).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("Start URL '{}' has no host", start_url))
        })?;
        Ok(Self {
            url: start_url.to_string(),
            domain,
        })
    }
}

/// Mutable context threaded through every step of a run
#[derive(Debug)]
pub struct RunState {
    origin: Origin,
    goal: String,
    budget: Budget,
    frontier: Frontier,
    records: RecordStore,
    error_count: u32,
    retry_count: u32,
    last_request_time: Option<Instant>,
    step_count: u64,
    status_message: String,
    current_url: Option<String>,
}

impl RunState {
    /// Creates the state for a new run and queues the start URL
    pub fn new(start_url: &str, goal: impl Into<String>, budget: Budget) -> Result<Self, GleanError> {
        let origin = Origin::parse(start_url)?;
        let mut frontier = Frontier::new();
        frontier.enqueue([origin.url.as_str()]);
        tracing::info!("Added starting URL to queue: {}", origin.url);

        Ok(Self {
            origin,
            goal: goal.into(),
            records: RecordStore::new(budget.max_records),
            budget,
            frontier,
            error_count: 0,
            retry_count: 0,
            last_request_time: None,
            step_count: 0,
            status_message: "Initializing...".to_string(),
            current_url: None,
        })
    }

    /// Creates the state described by a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, GleanError> {
        let budget = Budget::from_config(&config.budget, config.run.max_records);
        Self::new(&config.run.start_url, config.run.goal.clone(), budget)
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn domain(&self) -> &str {
        &self.origin.domain
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn records_count(&self) -> usize {
        self.records.count()
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn last_request_time(&self) -> Option<Instant> {
        self.last_request_time
    }

    /// Stamps the start of a network operation
    pub fn stamp_request(&mut self, now: Instant) {
        self.last_request_time = Some(now);
    }

    /// Records the attempt number of a failing operation
    pub fn set_retry_count(&mut self, attempt: u32) {
        self.retry_count = attempt;
    }

    /// Resets the retry counter after a successful operation
    pub fn reset_retry_count(&mut self) {
        self.retry_count = 0;
    }

    /// Records one permanent error
    pub fn record_error(&mut self, error: &str) {
        self.error_count = self.error_count.saturating_add(1);
        tracing::error!(
            "Error {}/{}: {}",
            self.error_count,
            self.budget.max_errors,
            error
        );
    }

    /// Sets the URL being processed by the current step
    pub fn set_current_url(&mut self, url: Option<String>) {
        self.current_url = url;
    }

    /// Adds an extracted record; returns true if it was new
    pub fn add_record(&mut self, record: Record) -> bool {
        self.records.add(record)
    }

    /// Appends URLs to the frontier; returns how many were new
    pub fn enqueue_links<I, S>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added = self.frontier.enqueue(links);
        if added > 0 {
            tracing::info!("Added {} new links to queue", added);
        }
        added
    }

    /// Marks a URL as processed
    pub fn mark_visited(&mut self, url: &str) {
        self.frontier.mark_visited(url);
    }

    /// Advances the step counter and records a status message
    pub fn update_status(&mut self, message: impl Into<String>) {
        self.step_count += 1;
        self.status_message = message.into();
        tracing::info!("Step {}: {}", self.step_count, self.status_message);
        tracing::info!(
            "Progress: {}/{} records, {} links queued, {} visited",
            self.records.count(),
            self.budget.max_records,
            self.frontier.len(),
            self.frontier.visited_count()
        );
    }

    /// Replaces the status message without counting a step
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Returns whether the record limit has been reached
    pub fn has_max_records(&self) -> bool {
        self.records.count() >= self.budget.max_records
    }

    /// Returns whether the error ceiling has been reached
    pub fn has_max_errors(&self) -> bool {
        self.error_count >= self.budget.max_errors
    }

    /// Consumes the state, returning the records in insertion order
    pub fn into_records(self) -> Vec<Record> {
        self.records.into_records()
    }
}
