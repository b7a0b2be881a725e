use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured record extracted from a detail page
///
/// Records are identified by `source_url`. They are created by the
/// extraction step only and never change after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub description: String,
    pub application_info: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<DateTime<Utc>>,
    pub source_url: String,
}

impl Record {
    /// Creates a record with no posting date
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        description: impl Into<String>,
        application_info: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            application_info: application_info.into(),
            company: company.into(),
            posted_date: None,
            source_url: source_url.into(),
        }
    }

    /// Sets the posting date
    pub fn with_posted_date(mut self, posted_date: Option<DateTime<Utc>>) -> Self {
        self.posted_date = posted_date;
        self
    }
}
