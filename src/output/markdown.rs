//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a run,
//! including its termination reason, counters and the collected records.

use crate::crawler::CrawlReport;
use crate::output::stats::RunStatistics;
use crate::output::traits::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Maximum characters of a record description shown in the summary
const DESCRIPTION_PREVIEW_CHARS: usize = 160;

/// Writes the markdown summary of a run
///
/// # Arguments
///
/// * `report` - The finished run
/// * `config_hash` - Hash of the configuration file the run used
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn write_markdown_report(
    report: &CrawlReport,
    config_hash: &str,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(report, config_hash);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_report(report: &CrawlReport, config_hash: &str) -> String {
    let stats = RunStatistics::from_report(report);
    let mut md = String::new();

    md.push_str("# Gleaner Run Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", report.start_url));
    md.push_str(&format!("- **Goal**: {}\n", report.goal));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        stats.duration_seconds
    ));
    md.push_str(&format!("- **Finished Because**: {}\n", report.reason));
    if report.reasons.len() > 1 {
        let all: Vec<&str> = report.reasons.iter().map(|r| r.as_str()).collect();
        md.push_str(&format!("- **All Reasons**: {}\n", all.join(", ")));
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Records | {} |\n", stats.records));
    md.push_str(&format!("| Pages Visited | {} |\n", stats.visited));
    md.push_str(&format!("| Errors | {} |\n", stats.errors));
    md.push_str(&format!("| Steps | {} |\n", stats.steps));
    md.push_str(&format!("| Yield | {:.1}% |\n\n", stats.yield_rate()));

    md.push_str("## Records\n\n");
    if report.records.is_empty() {
        md.push_str("_No records were collected._\n");
        return md;
    }

    md.push_str("| # | Title | Company | Posted | Source |\n");
    md.push_str("|---|-------|---------|--------|--------|\n");
    for (i, record) in report.records.iter().enumerate() {
        let posted = record
            .posted_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            i + 1,
            escape_cell(&record.title),
            escape_cell(&record.company),
            posted,
            record.source_url
        ));
    }
    md.push('\n');

    for record in &report.records {
        md.push_str(&format!("### {}\n\n", record.title));
        md.push_str(&format!("- **Company**: {}\n", record.company));
        md.push_str(&format!("- **Apply**: {}\n", record.application_info));
        md.push_str(&format!("- **Source**: {}\n\n", record.source_url));
        if !record.description.is_empty() {
            md.push_str(&preview(&record.description));
            md.push_str("\n\n");
        }
    }

    md
}

/// Escapes characters that would break a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Shortens a description for display
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(DESCRIPTION_PREVIEW_CHARS) {
        Some((index, _)) => format!("{}...", &flat[..index]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::TerminationReason;
    use crate::state::Record;
    use std::time::Duration;
    use tempfile::TempDir;

    fn report(records: Vec<Record>) -> CrawlReport {
        CrawlReport {
            start_url: "https://acme.test/".to_string(),
            goal: "rust jobs".to_string(),
            visited_count: 3,
            error_count: 0,
            step_count: 3,
            reason: TerminationReason::MaxRecordsReached,
            reasons: vec![
                TerminationReason::MaxRecordsReached,
                TerminationReason::FrontierExhausted,
            ],
            elapsed: Duration::from_secs(2),
            records,
        }
    }

    #[test]
    fn test_format_includes_reason_and_records() {
        let records = vec![Record::new(
            "Rust | Engineer",
            "Acme",
            "Build things",
            "jobs@acme.test",
            "https://acme.test/jobs/1",
        )];
        let md = format_markdown_report(&report(records), "abc123");

        assert!(md.starts_with("# Gleaner Run Summary"));
        assert!(md.contains("- **Finished Because**: max records reached"));
        assert!(md.contains("- **All Reasons**: max records reached, frontier exhausted"));
        assert!(md.contains("- **Config Hash**: abc123"));
        assert!(md.contains("| 1 | Rust \\| Engineer | Acme | - | https://acme.test/jobs/1 |"));
        assert!(md.contains("Build things"));
    }

    #[test]
    fn test_format_without_records() {
        let md = format_markdown_report(&report(Vec::new()), "abc123");
        assert!(md.contains("_No records were collected._"));
    }

    #[test]
    fn test_preview_truncates() {
        let long = "word ".repeat(100);
        let short = preview(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_write_markdown_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("summary.md");
        write_markdown_report(&report(Vec::new()), "hash", &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Gleaner Run Summary"));
    }
}
