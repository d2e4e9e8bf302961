//! Integration tests for the HTTP task client
//!
//! These tests use wiremock to stand in for the crawl backend and check how
//! each HTTP outcome is normalized or classified.

use crawl_watch::client::{ClientError, ErrorKind, HttpTaskClient, TaskClient, TaskId, TaskStatus};
use crawl_watch::config::BackendConfig;
use crawl_watch::TaskSeed;
use serde_json::json;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointed at the given mock server URI
fn client_for(base_url: &str) -> HttpTaskClient {
    let config = BackendConfig {
        base_url: base_url.to_string(),
        ..BackendConfig::default()
    };
    HttpTaskClient::new(&config).expect("Failed to build client")
}

fn seed(input: &str) -> TaskSeed {
    TaskSeed::parse(input).expect("Invalid test seed")
}

#[tokio::test]
async fn test_submit_sends_start_url_and_reads_task_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-crawl/"))
        .and(body_json(json!({ "start_url": "https://example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "taskId": "t1",
            "status": "initiated",
            "startUrl": "https://example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let ack = client.submit(&seed("https://example.com")).await.unwrap();

    assert_eq!(ack.handle.id.as_str(), "t1");
    assert_eq!(ack.handle.seed.as_str(), "https://example.com");
    assert_eq!(ack.status, TaskStatus::Initiated);
}

#[tokio::test]
async fn test_submit_accepts_snake_case_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-crawl/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "9f2c",
            "message": "Crawling started with BFS for https://example.com"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let ack = client.submit(&seed("https://example.com")).await.unwrap();

    assert_eq!(ack.handle.id.as_str(), "9f2c");
    assert_eq!(ack.status, TaskStatus::Initiated);
    assert!(ack.message.unwrap().contains("BFS"));
}

#[tokio::test]
async fn test_submit_rejected_by_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-crawl/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Invalid URL" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let err = client.submit(&seed("https://example.com")).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Submission {
            status: 400,
            message: "Invalid URL".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Submission);
}

#[tokio::test]
async fn test_submit_with_undecodable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start-crawl/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let err = client.submit(&seed("https://example.com")).await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_fetch_status_in_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "t1",
            "status": "in_progress",
            "startUrl": "https://example.com",
            "visitedUrls": ["https://example.com"]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let report = client.fetch_status(&TaskId::new("t1")).await.unwrap();

    assert_eq!(report.id.as_str(), "t1");
    assert_eq!(report.status, TaskStatus::InProgress);
    assert_eq!(report.start_url.as_deref(), Some("https://example.com"));
    assert_eq!(report.visited_urls, vec!["https://example.com".to_string()]);
    assert!(report.result.is_none());
}

#[tokio::test]
async fn test_fetch_status_completed_with_crawled_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t1",
            "status": "completed",
            "start_url": "https://example.com",
            "crawled_data": {
                "https://example.com": ["https://example.com/about"]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let report = client.fetch_status(&TaskId::new("t1")).await.unwrap();

    assert_eq!(report.status, TaskStatus::Completed);
    let result = report.result.expect("crawled data missing");
    assert_eq!(result.page_count(), 1);
    assert_eq!(
        result.links_for("https://example.com"),
        Some(&["https://example.com/about".to_string()][..])
    );
}

#[tokio::test]
async fn test_fetch_status_running_with_empty_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-status/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "t1",
            "status": "running",
            "start_url": "https://example.com",
            "crawled_data": {}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let report = client.fetch_status(&TaskId::new("t1")).await.unwrap();

    assert_eq!(report.status, TaskStatus::Other("running".to_string()));
    assert!(!report.status.is_terminal());
    assert!(report.result.is_none());
}

#[tokio::test]
async fn test_fetch_status_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-status/expired"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "Task not found." })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let err = client
        .fetch_status(&TaskId::new("expired"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::NotFound {
            id: "expired".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_fetch_status_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-status/t1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "crawler crashed" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let err = client.fetch_status(&TaskId::new("t1")).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::UnexpectedStatus {
            status: 500,
            message: "crawler crashed".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_network_error_is_repeatable() {
    // Reserve a free port, then close it so connections are refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = client_for(&base_url);
    let id = TaskId::new("t1");

    let first = client.fetch_status(&id).await.unwrap_err();
    let second = client.fetch_status(&id).await.unwrap_err();

    assert_eq!(first.kind(), ErrorKind::Network);
    assert_eq!(second.kind(), ErrorKind::Network);
    assert!(matches!(first, ClientError::Network(_)));
    assert!(matches!(second, ClientError::Network(_)));
}

#[tokio::test]
async fn test_request_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/task-status/t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "t1", "status": "in_progress" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client =
        HttpTaskClient::with_client(http, Url::parse(&mock_server.uri()).unwrap()).unwrap();

    let err = client.fetch_status(&TaskId::new("t1")).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/task-status/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "t1", "status": "failed" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&format!("{}/api", mock_server.uri()));
    let report = client.fetch_status(&TaskId::new("t1")).await.unwrap();

    assert_eq!(report.status, TaskStatus::Failed);
}
