//! Output module for run progress and results
//!
//! This module handles:
//! - Reporting progress to observers after every step
//! - Exporting extracted records as JSON
//! - Generating markdown summaries and console reports

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::write_records_json;
pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_report, RunStatistics};
pub use traits::{
    CollectingObserver, CrawlObserver, OutputError, OutputResult, StatusUpdate, TracingObserver,
};
