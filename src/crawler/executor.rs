//! Rate-limited retry executor
//!
//! Every network-bound operation of a run goes through [`RetryExecutor`].
//! It enforces the politeness interval between operations, retries failures
//! with exponential backoff and turns a terminal failure into a recorded
//! error instead of propagating it.

use crate::state::{Budget, RunState};
use crate::CollaboratorResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Throttle and retry policy for collaborator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryExecutor {
    max_retries: u32,
    min_request_interval: Duration,
}

impl RetryExecutor {
    /// Creates an executor
    ///
    /// `max_retries` is the total number of attempts and must be at least 1.
    pub fn new(max_retries: u32, min_request_interval: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            min_request_interval,
        }
    }

    /// Creates an executor for a run budget
    pub fn from_budget(budget: &Budget) -> Self {
        Self::new(budget.max_retries, budget.min_request_interval)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn min_request_interval(&self) -> Duration {
        self.min_request_interval
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.min_request_interval.saturating_mul(factor)
    }

    /// Runs `operation` under the throttle and retry policy
    ///
    /// `operation` is invoked once per attempt. Returns `Some` with the first
    /// successful value, or `None` once every attempt failed, in which case
    /// exactly one error has been recorded in `state`.
    ///
    /// # Arguments
    ///
    /// * `state` - Run state holding the request timestamp and counters
    /// * `label` - Short description of the operation, used in logs
    /// * `operation` - Produces a fresh future for each attempt
    pub async fn execute<T, F, Fut>(
        &self,
        state: &mut RunState,
        label: &str,
        mut operation: F,
    ) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CollaboratorResult<T>>,
    {
        for attempt in 1..=self.max_retries {
            self.throttle(state).await;

            match operation().await {
                Ok(value) => {
                    state.reset_retry_count();
                    return Some(value);
                }
                Err(e) => {
                    state.set_retry_count(attempt);

                    if attempt >= self.max_retries {
                        state.record_error(&format!(
                            "{} failed after {} attempts: {}",
                            label, self.max_retries, e
                        ));
                        return None;
                    }

                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}: {}",
                        label,
                        attempt,
                        self.max_retries,
                        delay,
                        e
                    );
                    sleep(delay).await;
                }
            }
        }

        None
    }

    /// Waits out the remainder of the politeness interval, then stamps the request
    async fn throttle(&self, state: &mut RunState) {
        if let Some(last) = state.last_request_time() {
            let elapsed = last.elapsed();
            if elapsed < self.min_request_interval {
                let wait = self.min_request_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait);
                sleep(wait).await;
            }
        }
        state.stamp_request(Instant::now());
    }
}
