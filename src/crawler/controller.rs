//! Crawl controller: decides the next step of a run
//!
//! The decision is a pure function of the run state and is recomputed before
//! every step.

use crate::state::RunState;
use crate::url::is_detail_url;
use std::fmt;

/// Next step of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Collect and categorize links from the head of the frontier
    Discover,

    /// Extract a record from a queued detail page
    Extract,

    /// Stop the run
    Complete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Discover => "discover",
            Action::Extract => "extract",
            Action::Complete => "complete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run ended
///
/// Variants are declared in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TerminationReason {
    Cancelled,
    MaxRecordsReached,
    MaxErrorsReached,
    FrontierExhausted,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::Cancelled => "cancelled",
            TerminationReason::MaxRecordsReached => "max records reached",
            TerminationReason::MaxErrorsReached => "error ceiling reached",
            TerminationReason::FrontierExhausted => "frontier exhausted",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lists every budget condition that ends the run, in priority order
pub fn termination_reasons(state: &RunState) -> Vec<TerminationReason> {
    let mut reasons = Vec::new();
    if state.has_max_records() {
        reasons.push(TerminationReason::MaxRecordsReached);
    }
    if state.has_max_errors() {
        reasons.push(TerminationReason::MaxErrorsReached);
    }
    if state.frontier().is_empty() {
        reasons.push(TerminationReason::FrontierExhausted);
    }
    reasons
}

/// Returns whether a detail page sits within the lookahead window
pub fn has_detail_in_lookahead(state: &RunState) -> bool {
    state
        .frontier()
        .peek(state.budget().detail_lookahead)
        .any(is_detail_url)
}

/// Returns whether the start URL has not been processed yet
///
/// The start URL is the first entry queued, so while it is pending it sits
/// at the head of the frontier.
pub fn origin_pending(state: &RunState) -> bool {
    state.frontier().contains(&state.origin().url)
}

/// Chooses the next step
///
/// # Rules
///
/// 1. Any termination condition holds: `Complete`
/// 2. The start URL is still queued: `Discover`
/// 3. A detail URL is among the first `detail_lookahead` queued entries: `Extract`
/// 4. The frontier is non-empty: `Discover`
/// 5. Otherwise: `Complete`
///
/// Rule 2 makes the start page a link source even when its own path looks
/// like a detail page.
pub fn decide(state: &RunState) -> Action {
    if !termination_reasons(state).is_empty() {
        return Action::Complete;
    }

    if origin_pending(state) {
        return Action::Discover;
    }

    if has_detail_in_lookahead(state) {
        return Action::Extract;
    }

    if !state.frontier().is_empty() {
        return Action::Discover;
    }

    Action::Complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Budget, Record};

    fn state_with(budget: Budget) -> RunState {
        RunState::new("https://acme.test/", "jobs", budget).unwrap()
    }

    #[test]
    fn test_start_url_is_discovered() {
        let state = state_with(Budget::default());
        assert_eq!(decide(&state), Action::Discover);
        assert!(termination_reasons(&state).is_empty());
    }

    fn past_origin(budget: Budget) -> RunState {
        let mut state = state_with(budget);
        let origin = state.frontier_mut().dequeue_front().unwrap();
        state.mark_visited(&origin);
        state
    }

    #[test]
    fn test_detail_in_lookahead_extracts() {
        let mut state = past_origin(Budget::default());
        state.enqueue_links(["https://acme.test/a", "https://acme.test/jobs/1"]);
        assert_eq!(decide(&state), Action::Extract);
    }

    #[test]
    fn test_detail_looking_start_url_is_discovered_first() {
        let mut state =
            RunState::new("https://acme.test/careers/", "jobs", Budget::default()).unwrap();
        assert!(origin_pending(&state));
        assert!(has_detail_in_lookahead(&state));
        assert_eq!(decide(&state), Action::Discover);

        let origin = state.frontier_mut().dequeue_front().unwrap();
        state.mark_visited(&origin);
        state.enqueue_links(["https://acme.test/careers/backend"]);
        assert!(!origin_pending(&state));
        assert_eq!(decide(&state), Action::Extract);
    }

    #[test]
    fn test_detail_beyond_lookahead_discovers() {
        let mut state = past_origin(Budget::default());
        state.enqueue_links((1..=5).map(|i| format!("https://acme.test/page-{}", i)));
        state.enqueue_links(["https://acme.test/jobs/1"]);
        // Five pages fill the lookahead window
        assert_eq!(decide(&state), Action::Discover);
    }

    #[test]
    fn test_empty_frontier_completes() {
        let mut state = state_with(Budget::default());
        let url = state.frontier_mut().dequeue_front().unwrap();
        state.mark_visited(&url);
        assert_eq!(decide(&state), Action::Complete);
        assert_eq!(
            termination_reasons(&state),
            vec![TerminationReason::FrontierExhausted]
        );
    }

    #[test]
    fn test_max_records_completes_even_with_work_left() {
        let mut state = state_with(Budget::default().with_max_records(1));
        state.enqueue_links(["https://acme.test/jobs/1"]);
        state.add_record(Record::new("t", "c", "d", "a", "https://acme.test/jobs/0"));
        assert_eq!(decide(&state), Action::Complete);
        assert_eq!(
            termination_reasons(&state),
            vec![TerminationReason::MaxRecordsReached]
        );
    }

    #[test]
    fn test_reasons_listed_in_priority_order() {
        let mut state = state_with(Budget::default().with_max_records(1).with_max_errors(1));
        state.frontier_mut().dequeue_front();
        state.add_record(Record::new("t", "c", "d", "a", "https://acme.test/jobs/0"));
        state.record_error("boom");

        let reasons = termination_reasons(&state);
        assert_eq!(
            reasons,
            vec![
                TerminationReason::MaxRecordsReached,
                TerminationReason::MaxErrorsReached,
                TerminationReason::FrontierExhausted,
            ]
        );
        assert_eq!(decide(&state), Action::Complete);
    }

    #[test]
    fn test_error_ceiling_completes() {
        let mut state = state_with(Budget::default().with_max_errors(1));
        state.record_error("boom");
        assert_eq!(decide(&state), Action::Complete);
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(TerminationReason::Cancelled.to_string(), "cancelled");
        assert_eq!(Action::Extract.to_string(), "extract");
    }
}
