//! HTTP collaborator tests against a mock server

use crate::support::{completion, html, mount_page, API_KEY};
use gleaner::config::{resolve_api_key, LlmConfig, UserAgentConfig};
use gleaner::crawler::{HttpPageCollector, PageCollector};
use gleaner::llm::OpenAiClient;
use gleaner::{CollaboratorError, ConfigError};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collector() -> HttpPageCollector {
    HttpPageCollector::new(&UserAgentConfig::default()).unwrap()
}

#[tokio::test]
async fn test_collect_links_keeps_same_domain_anchors() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/careers",
        r#"<html><body>
            <div class="job">Backend team, remote friendly
                <a href="/jobs/7">Rust Engineer</a>
            </div>
            <a href="https://other.test/jobs/8">Elsewhere</a>
            <a href="javascript:void(0)">Menu</a>
        </body></html>"#,
    )
    .await;

    let url = format!("{}/careers", server.uri());
    let links = collector().collect_links(&url).await.unwrap();

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].href, format!("{}/jobs/7", server.uri()));
    assert_eq!(links[0].anchor_text, "Rust Engineer");
    assert!(links[0].context.contains("Backend team"));
}

#[tokio::test]
async fn test_collect_links_sends_user_agent() {
    let server = MockServer::start().await;
    let agent = UserAgentConfig::default().header_value();
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", agent.as_str()))
        .respond_with(html("<html><body></body></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let links = collector()
        .collect_links(&format!("{}/", server.uri()))
        .await
        .unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_missing_page_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = collector()
        .collect_links(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, CollaboratorError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_non_html_is_content_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .mount(&server)
        .await;

    let err = collector()
        .collect_links(&format!("{}/brochure.pdf", server.uri()))
        .await
        .unwrap_err();
    match err {
        CollaboratorError::ContentMismatch { content_type, .. } => {
            assert!(content_type.starts_with("application/pdf"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_text_normalises_whitespace() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/jobs/1",
        r#"<html><head><script>var x = 1;</script></head><body>
            <h1>Rust   Developer</h1>
            <p>Work
               remotely.</p>
        </body></html>"#,
    )
    .await;

    let text = collector()
        .fetch_text(&format!("{}/jobs/1", server.uri()), 1000)
        .await
        .unwrap();
    assert!(text.contains("Rust Developer"));
    assert!(text.contains("Work remotely."));
    assert!(!text.contains("var x"));
}

#[tokio::test]
async fn test_fetch_text_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/blank", "<html><body>   </body></html>").await;

    let err = collector()
        .fetch_text(&format!("{}/blank", server.uri()), 1000)
        .await
        .unwrap_err();
    assert!(matches!(err, CollaboratorError::EmptyContent(_)));
}

#[derive(Debug, Deserialize)]
struct Echo {
    answer: u32,
}

fn llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: format!("{}/v1", server.uri()),
        model: "test-model".to_string(),
        ..LlmConfig::default()
    }
}

#[tokio::test]
async fn test_complete_json_decodes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(body_string_contains("\"model\":\"test-model\""))
        .and(body_string_contains("json_object"))
        .respond_with(completion(json!({ "answer": 42 })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), API_KEY).unwrap();
    let echo: Echo = client.complete_json("system", "question").await.unwrap();
    assert_eq!(echo.answer, 42);
}

#[tokio::test]
async fn test_complete_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), API_KEY).unwrap();
    let err = client.complete("system", "question").await.unwrap_err();
    match err {
        CollaboratorError::Model(message) => assert!(message.contains("slow down")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_json_rejects_malformed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(&llm_config(&server), API_KEY).unwrap();
    let result: Result<Echo, _> = client.complete_json("system", "question").await;
    assert!(matches!(result, Err(CollaboratorError::Decode(_))));
}

#[test]
fn test_unset_api_key_variable() {
    let llm = LlmConfig {
        api_key_env: "GLEANER_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..LlmConfig::default()
    };
    let result = resolve_api_key(&llm);
    assert!(matches!(result, Err(ConfigError::MissingCredential(_))));
}
