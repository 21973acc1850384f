//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawl
//! jobs end-to-end through the real HTTP fetcher.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumi_sweep::config::{Config, CrawlJobConfig, OutputConfig, UserAgentConfig};
use sumi_sweep::crawler::{crawl, run_job, CrawlOutcome, HttpFetcher};
use sumi_sweep::progress::{JsonLinesSink, ProgressEvent, ProgressSink, SinkError};
use sumi_sweep::{JobState, ProgressReporter, SweepError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every event it receives
#[derive(Clone, Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressSink for RecordingSink {
    async fn send(&mut self, event: &ProgressEvent) -> Result<(), SinkError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
        contact_email: Some("test@example.com".to_string()),
    }
}

/// Creates a test configuration crawling `seed`
fn create_test_config(seed: &str) -> Config {
    Config {
        job: CrawlJobConfig::new(seed),
        user_agent: test_user_agent(),
        output: OutputConfig::default(),
    }
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Runs `request` over HTTP and returns the outcome plus every event emitted
async fn run_http_job(request: &CrawlJobConfig) -> (CrawlOutcome, Vec<ProgressEvent>) {
    let fetcher = HttpFetcher::new(&test_user_agent()).expect("Failed to build fetcher");
    let (reporter, mut rx) = ProgressReporter::channel();

    let outcome = run_job(request, fetcher, reporter, None).await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (outcome, events)
}

#[tokio::test]
async fn test_seed_without_links() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Home", "<p>No links here</p>")).await;

    let request = CrawlJobConfig::new(format!("{}/", mock_server.uri()));
    let (outcome, events) = run_http_job(&request).await;

    assert_eq!(outcome.state, JobState::Completed);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].title, "Home");
    assert!(outcome.results[0].links.is_empty());

    match events.last() {
        Some(ProgressEvent::Complete { data }) => assert_eq!(data.len(), 1),
        other => panic!("expected complete event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_page_budget_limits_results() {
    let mock_server = MockServer::start().await;
    let anchors: String = (1..=5)
        .map(|i| format!(r#"<a href="/child{}">Child {}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", html_page("Home", &anchors)).await;
    for i in 1..=5 {
        mount_page(
            &mock_server,
            &format!("/child{}", i),
            html_page(&format!("Child {}", i), ""),
        )
        .await;
    }

    let mut request = CrawlJobConfig::new(format!("{}/", mock_server.uri()));
    request.max_depth = 1;
    request.max_pages = 3;
    let (outcome, events) = run_http_job(&request).await;

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.results[0].links.len(), 5);
    assert_eq!(outcome.results[1].title, "Child 1");
    assert_eq!(outcome.results[2].title, "Child 2");

    let statuses: Vec<&ProgressEvent> = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Status { .. }))
        .collect();
    assert_eq!(
        statuses,
        vec![
            &ProgressEvent::status("Crawling batch of 1 (Depth 0)..."),
            &ProgressEvent::status("Crawling batch of 2 (Depth 1)..."),
        ]
    );
}

#[tokio::test]
async fn test_seed_timeout_is_contained() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html_page("Slow", r#"<a href="/next">Next</a>"#).set_delay(Duration::from_millis(1500)),
    )
    .await;

    let mut request = CrawlJobConfig::new(format!("{}/", mock_server.uri()));
    request.timeout = 200;
    let (outcome, events) = run_http_job(&request).await;

    assert_eq!(outcome.state, JobState::Completed);
    assert_eq!(outcome.results.len(), 1);

    let page = &outcome.results[0];
    assert_eq!(page.title, "Navigation Error");
    assert!(page.error.as_deref().unwrap().contains("Timeout"));
    assert!(page.links.is_empty());
    assert!(page.content.is_empty());
    assert!(matches!(events.last(), Some(ProgressEvent::Complete { .. })));
}

#[tokio::test]
async fn test_paragraph_content_extraction() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html_page(
            "Article",
            "<nav>Menu</nav>\
             <article>\
               <p>Tiny</p>\
               <p>The first paragraph is long enough to keep.</p>\
               <p>The second paragraph is long enough too.</p>\
             </article>",
        ),
    )
    .await;

    let mut request = CrawlJobConfig::new(format!("{}/", mock_server.uri()));
    request.content_css = "article".to_string();
    let (outcome, _) = run_http_job(&request).await;

    assert_eq!(
        outcome.results[0].content,
        "The first paragraph is long enough to keep.\n\nThe second paragraph is long enough too."
    );
}

#[tokio::test]
async fn test_same_domain_filter() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<a href="/local">Local</a><a href="http://foreign.invalid/page">Foreign</a>"#,
        ),
    )
    .await;

    let base = mock_server.uri();
    let mut request = CrawlJobConfig::new(format!("{}/", base));
    request.max_depth = 0;

    let (outcome, _) = run_http_job(&request).await;
    assert_eq!(outcome.results[0].links, vec![format!("{}/local", base)]);

    request.same_domain = false;
    let (outcome, _) = run_http_job(&request).await;
    assert_eq!(
        outcome.results[0].links,
        vec![
            format!("{}/local", base),
            "http://foreign.invalid/page".to_string()
        ]
    );
}

#[tokio::test]
async fn test_include_and_exclude_patterns() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html_page(
            "Home",
            r#"<a href="/docs/intro">Intro</a>
               <a href="/docs/draft-notes">Draft</a>
               <a href="/blog/post">Blog</a>"#,
        ),
    )
    .await;

    let base = mock_server.uri();
    let mut request = CrawlJobConfig::new(format!("{}/", base));
    request.max_depth = 0;
    request.url_regex = Some("/docs/".to_string());
    request.exclude_regex = Some("draft".to_string());

    let (outcome, _) = run_http_job(&request).await;
    assert_eq!(outcome.results[0].links, vec![format!("{}/docs/intro", base)]);
}

#[tokio::test]
async fn test_http_error_page_still_renders() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        html_page("Home", r#"<a href="/missing">Missing</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            "<html><head><title>Not Found</title></head><body>Gone</body></html>",
        ))
        .mount(&mock_server)
        .await;

    let request = CrawlJobConfig::new(format!("{}/", mock_server.uri()));
    let (outcome, _) = run_http_job(&request).await;

    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[1].title, "Not Found");
    assert_eq!(outcome.results[1].content, "Gone");
    assert!(outcome.results[1].error.is_none());
}

#[tokio::test]
async fn test_config_error_emits_single_error_event() {
    let sink = RecordingSink::default();
    let config = create_test_config("ftp://example.com/");

    let outcome = crawl(&config, sink.clone(), None).await;

    assert_eq!(outcome.state, JobState::Aborted);
    assert!(matches!(outcome.error, Some(SweepError::Config(_))));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        ProgressEvent::Error { message } => assert!(message.starts_with("Config Error: ")),
        other => panic!("expected error event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_crawl_delivers_all_events_to_sink() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Home", r#"<a href="/a">A</a>"#)).await;
    mount_page(&mock_server, "/a", html_page("A", "")).await;

    let sink = RecordingSink::default();
    let config = create_test_config(&format!("{}/", mock_server.uri()));

    let outcome = crawl(&config, sink.clone(), None).await;
    assert!(outcome.is_completed());

    let kinds: Vec<&str> = sink.events().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec!["status", "progress", "status", "progress", "complete"]
    );
}

#[tokio::test]
async fn test_json_lines_event_stream() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Home", "")).await;

    let dir = tempfile::tempdir().unwrap();
    let events_path = dir.path().join("events.jsonl");
    let file = tokio::fs::File::create(&events_path).await.unwrap();

    let config = create_test_config(&format!("{}/", mock_server.uri()));
    let outcome = crawl(&config, JsonLinesSink::new(file), None).await;
    assert!(outcome.is_completed());

    let written = std::fs::read_to_string(&events_path).unwrap();
    let lines: Vec<serde_json::Value> = written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "status");
    assert_eq!(lines[1]["type"], "progress");
    assert_eq!(lines[1]["current"], 1);
    assert_eq!(lines[1]["total"], 10);
    assert_eq!(lines[1]["last_scraped"], "Home");
    assert_eq!(lines[2]["type"], "complete");
    assert_eq!(lines[2]["data"][0]["title"], "Home");
    assert!(lines[2]["data"][0].get("error").is_none());
}

#[tokio::test]
async fn test_cancelled_crawl_aborts() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", html_page("Home", "")).await;

    let sink = RecordingSink::default();
    let config = create_test_config(&format!("{}/", mock_server.uri()));
    let (_tx, cancel) = tokio::sync::watch::channel(true);

    let outcome = crawl(&config, sink.clone(), Some(cancel)).await;

    assert_eq!(outcome.state, JobState::Aborted);
    assert!(matches!(outcome.error, Some(SweepError::Cancelled { pages: 0 })));
    assert!(matches!(
        sink.events().as_slice(),
        [ProgressEvent::Error { .. }]
    ));
}
