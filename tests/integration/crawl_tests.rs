//! End-to-end crawl tests
//!
//! A wiremock server plays the crawled site and a second one plays the
//! chat completion endpoint, so a full run goes through the real HTTP
//! collector, categorizers and extractor.

use crate::support::{completion, job_json, mount_page, test_config, API_KEY};
use gleaner::crawler::{crawl, Action, Coordinator, TerminationReason};
use gleaner::output::CollectingObserver;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_extraction(llm: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Extract job information"))
        .respond_with(completion(job_json("Rust Developer")))
        .mount(llm)
        .await;
}

async fn mount_job_page(site: &MockServer, route: &str) {
    mount_page(
        site,
        route,
        "<html><body><h1>Rust Developer</h1><p>Acme is hiring.</p></body></html>",
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_stops_at_max_records() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<html><head><title>Jobs</title></head><body>
            <div><a href="/jobs/1">Rust Developer</a></div>
            <div><a href="/jobs/2">Senior Rust Developer</a></div>
            <div><a href="/jobs/3">Staff Rust Developer</a></div>
            <a href="https://elsewhere.test/jobs/4">External</a>
            <a href="mailto:jobs@example.com">Email us</a>
        </body></html>"#,
    )
    .await;
    for route in ["/jobs/1", "/jobs/2", "/jobs/3"] {
        mount_job_page(&site, route).await;
    }

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(body_string_contains("Extract job information"))
        .respond_with(completion(job_json("Rust Developer")))
        .expect(2)
        .mount(&llm)
        .await;

    let config = test_config(&site, &llm, 2, 10);
    let coordinator = Coordinator::from_config(&config, API_KEY, true).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.reason, TerminationReason::MaxRecordsReached);
    assert_eq!(report.error_count, 0);
    assert_eq!(report.records[0].source_url, format!("{}/jobs/1", site.uri()));
    assert_eq!(report.records[1].source_url, format!("{}/jobs/2", site.uri()));
    assert_eq!(report.records[0].company, "Acme");
    assert!(report.records[0].description.contains("Location: Remote"));
    assert!(report.records[0].posted_date.is_some());
}

#[tokio::test]
async fn test_llm_categorizer_drives_discovery() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<html><body>
            <a href="/opportunities/42">Rust Developer</a>
            <a href="/about">About</a>
        </body></html>"#,
    )
    .await;
    mount_page(&site, "/about", "<html><body><p>About us</p></body></html>").await;
    mount_job_page(&site, "/jobs/42").await;

    // The model points at a listing page that leads to the posting
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Categorize these links"))
        .and(body_string_contains("Text: About"))
        .respond_with(completion(json!({
            "job_detail_links": [],
            "job_listing_pages": [format!("{}/opportunities/42", site.uri())],
            "navigation_links": [
                format!("{}/about", site.uri()),
                "https://invented.test/page"
            ]
        })))
        .mount(&llm)
        .await;
    mount_page(
        &site,
        "/opportunities/42",
        r#"<html><body><a href="/jobs/42">Apply here</a></body></html>"#,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Categorize these links"))
        .and(body_string_contains("Text: Apply here"))
        .respond_with(completion(json!({
            "job_detail_links": [format!("{}/jobs/42", site.uri())],
            "job_listing_pages": [],
            "navigation_links": []
        })))
        .mount(&llm)
        .await;
    mount_extraction(&llm).await;

    let config = test_config(&site, &llm, 5, 10);
    let observer = Arc::new(CollectingObserver::new());
    let coordinator = Coordinator::from_config(&config, API_KEY, false)
        .unwrap()
        .with_observer(observer.clone());
    let report = coordinator.run().await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].source_url, format!("{}/jobs/42", site.uri()));
    assert_eq!(report.reason, TerminationReason::FrontierExhausted);

    let actions: Vec<Action> = observer.updates().iter().map(|u| u.action).collect();
    assert!(actions.contains(&Action::Discover));
    assert!(actions.contains(&Action::Extract));
    assert_eq!(actions.last(), Some(&Action::Complete));
}

#[tokio::test]
async fn test_error_ceiling_ends_run() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&site)
        .await;

    let config = test_config(&site, &llm, 5, 1);
    let coordinator = Coordinator::from_config(&config, API_KEY, true).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.error_count, 1);
    assert_eq!(report.visited_count, 1);
    assert!(report.records.is_empty());
    assert_eq!(report.reason, TerminationReason::MaxErrorsReached);
}

#[tokio::test]
async fn test_failing_extraction_costs_one_error() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r#"<html><body><a href="/jobs/1">Broken</a><a href="/jobs/2">Fine</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/jobs/1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&site)
        .await;
    mount_job_page(&site, "/jobs/2").await;
    mount_extraction(&llm).await;

    let config = test_config(&site, &llm, 5, 10);
    let coordinator = Coordinator::from_config(&config, API_KEY, true).unwrap();
    let report = coordinator.run().await;

    assert_eq!(report.error_count, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.visited_count, 3);
    assert_eq!(report.reason, TerminationReason::FrontierExhausted);
}

#[tokio::test]
async fn test_frontier_stays_consistent_every_step() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(
        &site,
        "/",
        r##"<html><body>
            <a href="/jobs/1">One</a>
            <a href="/jobs/1/">One again</a>
            <a href="/jobs/1#apply">One with anchor</a>
            <a href="/jobs/1?utm_source=feed">One tracked</a>
            <a href="/page/2">Next page</a>
        </body></html>"##,
    )
    .await;
    mount_page(
        &site,
        "/page/2",
        r#"<html><body><a href="/jobs/1">One</a><a href="/jobs/2">Two</a><a href="/">Home</a></body></html>"#,
    )
    .await;
    mount_job_page(&site, "/jobs/1").await;
    mount_job_page(&site, "/jobs/2").await;
    mount_extraction(&llm).await;

    let config = test_config(&site, &llm, 5, 10);
    let mut coordinator = Coordinator::from_config(&config, API_KEY, true).unwrap();

    let mut steps = 0;
    while coordinator.step().await != Action::Complete {
        steps += 1;
        let frontier = coordinator.state().frontier();
        assert!(frontier.is_consistent(), "inconsistent after step {}", steps);
        assert!(frontier.queued_keys().is_disjoint(frontier.visited_keys()));
        assert!(steps < 20, "run did not terminate");
    }

    let state = coordinator.state();
    assert_eq!(state.records_count(), 2);
    assert_eq!(state.frontier().visited_count(), 4);
    assert_eq!(state.error_count(), 0);
}

#[tokio::test]
async fn test_crawl_helper_on_page_without_links() {
    let site = MockServer::start().await;
    let llm = MockServer::start().await;

    mount_page(&site, "/", "<html><body><p>Nothing here yet.</p></body></html>").await;
    // A page without anchors never reaches the model
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&llm)
        .await;

    let config = test_config(&site, &llm, 3, 10);
    let report = crawl(&config, API_KEY).await.unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.visited_count, 1);
    assert_eq!(report.step_count, 1);
    assert_eq!(report.reasons, vec![TerminationReason::FrontierExhausted]);
}
