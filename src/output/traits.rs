//! Run observers and progress updates
//!
//! This module defines the observer interface the coordinator reports to
//! after every step, plus the error type shared by the output writers.

use crate::crawler::Action;
use crate::state::RunState;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Snapshot of a run after one controller step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Steps taken so far
    pub step: u64,

    /// Action the step performed
    pub action: Action,

    /// Human-readable status message
    pub message: String,

    /// Records collected so far
    pub records: usize,

    /// Record limit of the run
    pub max_records: usize,

    /// URLs waiting in the frontier
    pub queued: usize,

    /// URLs already processed
    pub visited: usize,

    /// Errors recorded so far
    pub errors: u32,

    /// URL handled by the step, if any
    pub current_url: Option<String>,
}

impl StatusUpdate {
    /// Captures the observable fields of a run state
    pub fn from_state(state: &RunState, action: Action) -> Self {
        Self {
            step: state.step_count(),
            action,
            message: state.status_message().to_string(),
            records: state.records_count(),
            max_records: state.budget().max_records,
            queued: state.frontier().len(),
            visited: state.frontier().visited_count(),
            errors: state.error_count(),
            current_url: state.current_url().map(str::to_string),
        }
    }
}

/// Receives one update per controller step
///
/// Implementations must be thread-safe.
pub trait CrawlObserver: Send + Sync {
    fn on_status(&self, update: &StatusUpdate);
}

/// Logs every update through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_status(&self, update: &StatusUpdate) {
        tracing::info!(
            step = update.step,
            action = %update.action,
            records = update.records,
            queued = update.queued,
            visited = update.visited,
            errors = update.errors,
            "{}",
            update.message
        );
    }
}

/// Keeps every update in memory
#[derive(Debug, Default)]
pub struct CollectingObserver {
    updates: Mutex<Vec<StatusUpdate>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of all updates received so far
    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CrawlObserver for CollectingObserver {
    fn on_status(&self, update: &StatusUpdate) {
        self.updates.lock().unwrap().push(update.clone());
    }
}
