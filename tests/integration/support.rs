//! Shared helpers for the integration tests

use gleaner::config::{parse_config, Config};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "sk-test-0000";

/// Wraps an HTML body in a 200 response
pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html")
}

/// Wraps a JSON object in a chat completion response
pub fn completion(content: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content.to_string() },
            "finish_reason": "stop"
        }]
    }))
}

/// Serves an HTML page at `route`
pub async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Builds a validated configuration pointing at the mock servers
pub fn test_config(site: &MockServer, llm: &MockServer, max_records: usize, max_errors: u32) -> Config {
    let toml = format!(
        r#"
[run]
start-url = "{site}/"
goal = "remote rust developer"
max-records = {max_records}

[budget]
min-request-interval-ms = 5
max-retries = 2
max-errors = {max_errors}

[user-agent]
crawler-name = "GleanerTest"
crawler-version = "0.0.1"
contact-url = "https://example.com/about"

[llm]
base-url = "{llm}/v1"
model = "test-model"
"#,
        site = site.uri(),
        llm = llm.uri(),
        max_records = max_records,
        max_errors = max_errors,
    );
    parse_config(&toml).expect("test config is valid")
}

/// Extraction reply for a posting titled `title`
pub fn job_json(title: &str) -> Value {
    json!({
        "job_title": title,
        "company_name": "Acme",
        "job_description": "Write Rust.",
        "application_method": null,
        "posted_date": "2 days ago",
        "location": "Remote",
        "employment_type": null,
        "salary_range": null
    })
}
