//! Run statistics and console reporting
//!
//! This module derives summary figures from a finished run and prints them
//! for the command line.

use crate::crawler::CrawlReport;

/// Summary figures for a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    /// Records collected
    pub records: usize,

    /// URLs processed
    pub visited: usize,

    /// Errors recorded
    pub errors: u32,

    /// Discover and extract steps taken
    pub steps: u64,

    /// Wall-clock duration in seconds
    pub duration_seconds: f64,
}

impl RunStatistics {
    /// Computes statistics for a report
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            records: report.records.len(),
            visited: report.visited_count,
            errors: report.error_count,
            steps: report.step_count,
            duration_seconds: report.elapsed.as_secs_f64(),
        }
    }

    /// Records per processed URL, as a percentage
    pub fn yield_rate(&self) -> f64 {
        if self.visited == 0 {
            return 0.0;
        }
        (self.records as f64 / self.visited as f64) * 100.0
    }

    /// Errors per processed URL, as a percentage
    pub fn error_rate(&self) -> f64 {
        if self.visited == 0 {
            return 0.0;
        }
        (self.errors as f64 / self.visited as f64) * 100.0
    }
}

/// Prints a run report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The finished run
pub fn print_report(report: &CrawlReport) {
    let stats = RunStatistics::from_report(report);

    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Start URL: {}", report.start_url);
    println!("  Goal: {}", report.goal);
    println!("  Finished: {}", report.reason);
    if report.reasons.len() > 1 {
        let all: Vec<&str> = report.reasons.iter().map(|r| r.as_str()).collect();
        println!("  All reasons: {}", all.join(", "));
    }
    println!();

    println!("Overview:");
    println!("  Records collected: {}", stats.records);
    println!("  Pages visited: {}", stats.visited);
    println!(
        "  Errors: {} ({:.1}% of pages)",
        stats.errors,
        stats.error_rate()
    );
    println!("  Steps: {}", stats.steps);
    println!("  Duration: {:.1}s", stats.duration_seconds);
    println!(
        "  Yield: {:.1}% ({} / {} pages produced a record)",
        stats.yield_rate(),
        stats.records,
        stats.visited
    );
    println!();

    if !report.records.is_empty() {
        println!("Records:");
        for (i, record) in report.records.iter().enumerate() {
            println!("  {}. {} at {}", i + 1, record.title, record.company);
            println!("     {}", record.source_url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::TerminationReason;
    use crate::state::Record;
    use std::time::Duration;

    fn report() -> CrawlReport {
        CrawlReport {
            start_url: "https://acme.test/".to_string(),
            goal: "rust jobs".to_string(),
            records: vec![Record::new("t", "c", "d", "a", "https://acme.test/jobs/1")],
            visited_count: 4,
            error_count: 1,
            step_count: 4,
            reason: TerminationReason::FrontierExhausted,
            reasons: vec![TerminationReason::FrontierExhausted],
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_statistics_from_report() {
        let stats = RunStatistics::from_report(&report());
        assert_eq!(stats.records, 1);
        assert_eq!(stats.visited, 4);
        assert!((stats.yield_rate() - 25.0).abs() < 0.01);
        assert!((stats.error_rate() - 25.0).abs() < 0.01);
        assert!((stats.duration_seconds - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_rates_with_nothing_visited() {
        let mut report = report();
        report.visited_count = 0;
        let stats = RunStatistics::from_report(&report);
        assert_eq!(stats.yield_rate(), 0.0);
        assert_eq!(stats.error_rate(), 0.0);
    }
}
