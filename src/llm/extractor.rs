//! Record extraction with a language model

use crate::crawler::{HttpPageCollector, RecordExtractor};
use crate::llm::openai::OpenAiClient;
use crate::state::Record;
use crate::{CollaboratorError, CollaboratorResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

const SYSTEM_PROMPT: &str = "You extract structured information about a single job posting \
from web page text. Reply with a JSON object with the keys job_title, company_name, \
job_description, application_method, posted_date, location, employment_type and \
salary_range. Use null for anything not clearly present.";

/// Largest "N units ago" amount accepted
const MAX_RELATIVE_AMOUNT: i64 = 10_000;

/// Model reply shape
#[derive(Debug, Default, Deserialize)]
struct JobExtraction {
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    job_description: Option<String>,
    #[serde(default)]
    application_method: Option<String>,
    #[serde(default)]
    posted_date: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    employment_type: Option<String>,
    #[serde(default)]
    salary_range: Option<String>,
}

/// Trims a field and maps blank values to `None`
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
}

impl JobExtraction {
    /// Converts the reply into a record for `url`
    fn into_record(self, url: &str, now: DateTime<Utc>) -> CollaboratorResult<Record> {
        let title = non_blank(self.job_title)
            .ok_or_else(|| CollaboratorError::Model(format!("no job title found at {}", url)))?;
        let company = non_blank(self.company_name).unwrap_or_else(|| "Unknown".to_string());

        let mut description = non_blank(self.job_description).unwrap_or_default();
        for (label, value) in [
            ("Location", self.location),
            ("Employment type", self.employment_type),
            ("Salary", self.salary_range),
        ] {
            if let Some(value) = non_blank(value) {
                if !description.is_empty() {
                    description.push('\n');
                }
                description.push_str(&format!("{}: {}", label, value));
            }
        }

        let application_info = non_blank(self.application_method).unwrap_or_else(|| url.to_string());
        let posted_date = non_blank(self.posted_date).and_then(|d| parse_posted_date(&d, now));

        Ok(Record::new(title, company, description, application_info, url).with_posted_date(posted_date))
    }
}

/// Parses a posting date as written on job boards
///
/// Understands "N days ago", "N hours ago" (also weeks and minutes),
/// "today", "yesterday", RFC 3339 timestamps and `YYYY-MM-DD` dates.
/// Returns `None` for anything else.
///
/// # Arguments
///
/// * `text` - The date text
/// * `now` - Reference time for relative dates
pub fn parse_posted_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    static RELATIVE: OnceLock<Regex> = OnceLock::new();

    let text = text.trim();
    let lower = text.to_ascii_lowercase();

    match lower.as_str() {
        "" => return None,
        "today" | "just posted" | "just now" => return Some(now),
        "yesterday" => return Some(now - Duration::days(1)),
        _ => {}
    }

    if lower.contains("ago") {
        let relative = RELATIVE.get_or_init(|| {
            Regex::new(r"(\d+)\s*\+?\s*(minute|min|hour|hr|day|week|month)s?")
                .expect("relative date pattern is valid")
        });
        let captures = relative.captures(&lower)?;
        let amount: i64 = captures[1].parse().ok().filter(|n| *n <= MAX_RELATIVE_AMOUNT)?;
        let delta = match &captures[2] {
            "minute" | "min" => Duration::minutes(amount),
            "hour" | "hr" => Duration::hours(amount),
            "day" => Duration::days(amount),
            "week" => Duration::weeks(amount),
            "month" => Duration::days(amount * 30),
            _ => return None,
        };
        return Some(now - delta);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Builds the extraction prompt for a page
pub fn extraction_prompt(goal: &str, page_text: &str) -> String {
    format!(
        "Extract job information from the following webpage content.\n\n\
         User is looking for: {goal}\n\n\
         Webpage content:\n{page_text}\n\n\
         Only extract information that is clearly present in the content."
    )
}

/// Extractor that fetches page text and asks the model for a record
pub struct LlmRecordExtractor {
    client: Arc<OpenAiClient>,
    collector: Arc<HttpPageCollector>,
    page_text_limit: usize,
}

impl LlmRecordExtractor {
    pub fn new(
        client: Arc<OpenAiClient>,
        collector: Arc<HttpPageCollector>,
        page_text_limit: usize,
    ) -> Self {
        Self {
            client,
            collector,
            page_text_limit,
        }
    }
}

#[async_trait]
impl RecordExtractor for LlmRecordExtractor {
    async fn extract(&self, url: &str, goal: &str) -> CollaboratorResult<Record> {
        let page_text = self.collector.fetch_text(url, self.page_text_limit).await?;
        tracing::debug!("Loaded {} characters of text from {}", page_text.len(), url);

        let prompt = extraction_prompt(goal, &page_text);
        let reply: JobExtraction = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;
        let record = reply.into_record(url, Utc::now())?;

        tracing::info!("Extracted record: {} at {}", record.title, record.company);
        Ok(record)
    }
}
