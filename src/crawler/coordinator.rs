//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the control loop of a run. Before every step the
//! controller inspects the run state and picks one of:
//! - discovering links on the head of the frontier
//! - extracting a record from a queued detail page
//! - completing the run
//!
//! Every network-bound call goes through the retry executor, so a failing
//! page costs at most one recorded error and never aborts the run.

use crate::config::Config;
use crate::crawler::controller::{decide, termination_reasons, Action, TerminationReason};
use crate::crawler::executor::RetryExecutor;
use crate::crawler::fetcher::HttpPageCollector;
use crate::crawler::traits::{
    discover, LinkCategories, LinkCategorizer, PageCollector, RecordExtractor,
};
use crate::llm::{HeuristicCategorizer, LlmLinkCategorizer, LlmRecordExtractor, OpenAiClient};
use crate::output::{CrawlObserver, StatusUpdate, TracingObserver};
use crate::state::{Record, RunState};
use crate::url::{filter_links, is_detail_url};
use crate::GleanError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Start URL of the run
    pub start_url: String,

    /// Goal the run was collecting records for
    pub goal: String,

    /// Extracted records in insertion order
    pub records: Vec<Record>,

    /// Number of URLs processed
    pub visited_count: usize,

    /// Number of recorded errors
    pub error_count: u32,

    /// Number of discover and extract steps taken
    pub step_count: u64,

    /// Primary termination reason
    pub reason: TerminationReason,

    /// Every termination condition that held at the end, in priority order
    pub reasons: Vec<TerminationReason>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    state: RunState,
    executor: RetryExecutor,
    collector: Arc<dyn PageCollector>,
    categorizer: Arc<dyn LinkCategorizer>,
    extractor: Arc<dyn RecordExtractor>,
    observer: Arc<dyn CrawlObserver>,
    cancel: CancellationToken,
    max_run_time: Option<Duration>,
}

impl Coordinator {
    /// Creates a coordinator for a prepared run state
    ///
    /// # Arguments
    ///
    /// * `state` - Run state holding the start URL, goal and budget
    /// * `collector` - Fetches pages and returns their anchors
    /// * `categorizer` - Sorts anchors into detail, listing and navigation links
    /// * `extractor` - Produces records from detail pages
    pub fn new(
        state: RunState,
        collector: Arc<dyn PageCollector>,
        categorizer: Arc<dyn LinkCategorizer>,
        extractor: Arc<dyn RecordExtractor>,
    ) -> Self {
        let executor = RetryExecutor::from_budget(state.budget());
        Self {
            state,
            executor,
            collector,
            categorizer,
            extractor,
            observer: Arc::new(TracingObserver),
            cancel: CancellationToken::new(),
            max_run_time: None,
        }
    }

    /// Creates a coordinator wired to the HTTP collector and the language model
    ///
    /// With `offline_categorizer` set, links are sorted by URL heuristics
    /// instead of the model. Extraction always uses the model.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(GleanError)` - The start URL is invalid or an HTTP client could not be built
    pub fn from_config(
        config: &Config,
        api_key: &str,
        offline_categorizer: bool,
    ) -> Result<Self, GleanError> {
        let state = RunState::from_config(config)?;
        let collector = Arc::new(HttpPageCollector::new(&config.user_agent)?);
        let client = Arc::new(OpenAiClient::new(&config.llm, api_key)?);

        let categorizer: Arc<dyn LinkCategorizer> = if offline_categorizer {
            tracing::info!("Using offline link categorizer");
            Arc::new(HeuristicCategorizer::new())
        } else {
            Arc::new(LlmLinkCategorizer::new(client.clone()))
        };
        let extractor = Arc::new(LlmRecordExtractor::new(
            client,
            collector.clone(),
            config.llm.page_text_limit,
        ));

        Ok(Self::new(state, collector, categorizer, extractor)
            .with_max_run_time(config.run.max_run_time()))
    }

    /// Replaces the observer notified after every step
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Cancels the run once `limit` has elapsed
    pub fn with_max_run_time(mut self, limit: Option<Duration>) -> Self {
        self.max_run_time = limit;
        self
    }

    /// Token that stops the run at the next step boundary when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Runs one controller step
    ///
    /// Returns the action taken. `Action::Complete` leaves the state untouched.
    pub async fn step(&mut self) -> Action {
        let action = decide(&self.state);
        match action {
            Action::Discover => self.discover_step().await,
            Action::Extract => self.extract_step().await,
            Action::Complete => return action,
        }

        self.observer
            .on_status(&StatusUpdate::from_state(&self.state, action));
        action
    }

    /// Runs the main crawl loop until completion or cancellation
    ///
    /// Always returns a report; per-page failures are counted, not raised.
    pub async fn run(mut self) -> CrawlReport {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} for: {}",
            self.state.origin().url,
            self.state.goal()
        );

        let timer = self.max_run_time.map(|limit| {
            let token = self.cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(limit).await;
                tracing::warn!("Run time limit of {:?} reached, stopping", limit);
                token.cancel();
            })
        });

        let mut cancelled = false;
        loop {
            if self.cancel.is_cancelled() {
                tracing::warn!("Crawl cancelled after {} steps", self.state.step_count());
                cancelled = true;
                break;
            }

            if self.step().await == Action::Complete {
                break;
            }
        }

        if let Some(timer) = timer {
            timer.abort();
        }

        let mut reasons = termination_reasons(&self.state);
        if cancelled {
            reasons.insert(0, TerminationReason::Cancelled);
        }
        for reason in &reasons {
            tracing::info!("Completion reason: {}", reason);
        }
        let reason = reasons
            .first()
            .copied()
            .unwrap_or(TerminationReason::FrontierExhausted);

        self.state.set_current_url(None);
        self.state
            .set_status_message(format!("Crawl complete: {}", reason));
        self.observer
            .on_status(&StatusUpdate::from_state(&self.state, Action::Complete));

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl completed: {} records, {} pages visited, {} errors in {:?}",
            self.state.records_count(),
            self.state.frontier().visited_count(),
            self.state.error_count(),
            elapsed
        );

        let start_url = self.state.origin().url.clone();
        let goal = self.state.goal().to_string();
        let visited_count = self.state.frontier().visited_count();
        let error_count = self.state.error_count();
        let step_count = self.state.step_count();

        CrawlReport {
            start_url,
            goal,
            records: self.state.into_records(),
            visited_count,
            error_count,
            step_count,
            reason,
            reasons,
            elapsed,
        }
    }

    /// Collects and categorizes links on the head of the frontier
    async fn discover_step(&mut self) {
        let Some(url) = self.state.frontier_mut().dequeue_front() else {
            return;
        };
        self.state.set_current_url(Some(url.clone()));
        self.state
            .update_status(format!("Discovering links on {}", url));

        let goal = self.state.goal().to_string();
        let collector = self.collector.as_ref();
        let categorizer = self.categorizer.as_ref();
        let categories = self
            .executor
            .execute(&mut self.state, "Link discovery", || {
                discover(collector, categorizer, &url, &goal)
            })
            .await;

        match categories {
            Some(categories) => self.enqueue_categories(&url, categories),
            None => tracing::warn!("Failed to discover links on {}", url),
        }

        self.state.mark_visited(&url);
    }

    /// Validates categorized links and appends them in priority order
    fn enqueue_categories(&mut self, url: &str, categories: LinkCategories) {
        let LinkCategories {
            detail,
            listing,
            navigation,
        } = categories;
        let navigation_cap = self.state.budget().navigation_cap;

        let candidates: Vec<String> = detail
            .into_iter()
            .chain(listing)
            .chain(navigation.into_iter().take(navigation_cap))
            .collect();

        let accepted = filter_links(
            &candidates,
            url,
            self.state.frontier().visited_keys(),
            self.state.frontier().queued_keys(),
            self.state.domain(),
        );
        tracing::debug!(
            "Accepted {} of {} candidate links from {}",
            accepted.len(),
            candidates.len(),
            url
        );
        self.state.enqueue_links(accepted);
    }

    /// Extracts a record from the first queued detail page
    async fn extract_step(&mut self) {
        let Some(url) = self.state.frontier_mut().dequeue_matching(is_detail_url) else {
            return;
        };
        self.state.set_current_url(Some(url.clone()));
        self.state
            .update_status(format!("Extracting record from {}", url));

        let goal = self.state.goal().to_string();
        let extractor = self.extractor.as_ref();
        let record = self
            .executor
            .execute(&mut self.state, "Record extraction", || {
                extractor.extract(&url, &goal)
            })
            .await;

        match record {
            Some(mut record) => {
                if record.source_url != url {
                    tracing::debug!(
                        "Extractor returned source {} for {}, using the requested URL",
                        record.source_url,
                        url
                    );
                    record.source_url = url.clone();
                }
                self.state.add_record(record);
            }
            None => tracing::warn!("Failed to extract a record from {}", url),
        }

        self.state.mark_visited(&url);
    }
}
