//! HTTP task client implementation
//!
//! This module talks to the crawl backend over HTTP:
//! - Building the reqwest client with timeouts and user agent
//! - `POST /start-crawl/` to submit a task
//! - `GET /task-status/{id}` to query it
//! - Normalizing field names (`task_id` vs `taskId`, `crawled_data`)
//! - Classifying failures into [`ClientError`]

use super::{
    ClientError, CrawlResult, StatusReport, SubmitAck, TaskClient, TaskHandle, TaskId, TaskStatus,
};
use crate::config::BackendConfig;
use crate::url::TaskSeed;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const START_CRAWL_SEGMENT: &str = "start-crawl";
const TASK_STATUS_SEGMENT: &str = "task-status";

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use crawl_watch::config::BackendConfig;
/// use crawl_watch::client::build_http_client;
///
/// let client = build_http_client(&BackendConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &BackendConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`TaskClient`] backed by the crawl service's HTTP API
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Serialize)]
struct StartCrawlRequest<'a> {
    start_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct StartCrawlResponse {
    #[serde(rename = "taskId", alias = "task_id")]
    task_id: String,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "taskId", alias = "task_id")]
    task_id: Option<String>,
    status: TaskStatus,
    #[serde(default, rename = "startUrl", alias = "start_url")]
    start_url: Option<String>,
    #[serde(default, rename = "visitedUrls", alias = "visited_urls")]
    visited_urls: Option<Vec<String>>,
    #[serde(default, rename = "crawled_data", alias = "crawledData")]
    crawled_data: Option<CrawlResult>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl HttpTaskClient {
    /// Creates a client for the backend described by `config`
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Endpoint(format!("{}: {}", config.base_url, e)))?;
        let client = build_http_client(config).map_err(|e| ClientError::Endpoint(e.to_string()))?;
        Self::with_client(client, base_url)
    }

    /// Creates a client from an existing reqwest client
    pub fn with_client(client: Client, base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Endpoint(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Endpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl TaskClient for HttpTaskClient {
    async fn submit(&self, seed: &TaskSeed) -> Result<SubmitAck, ClientError> {
        // Trailing empty segment: the backend routes "/start-crawl/"
        let url = self.endpoint(&[START_CRAWL_SEGMENT, ""])?;
        tracing::debug!("Submitting crawl for {} to {}", seed, url);

        let response = self
            .client
            .post(url.clone())
            .json(&StartCrawlRequest {
                start_url: seed.as_str(),
            })
            .send()
            .await
            .map_err(|e| ClientError::from_transport(url.as_str(), &e))?;

        let status = response.status();
        let body = read_body(url.as_str(), response).await?;

        if !status.is_success() {
            return Err(ClientError::Submission {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let parsed: StartCrawlResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(SubmitAck {
            handle: TaskHandle {
                id: TaskId::new(parsed.task_id),
                seed: seed.clone(),
            },
            status: parsed.status.unwrap_or(TaskStatus::Initiated),
            message: parsed.message,
        })
    }

    async fn fetch_status(&self, id: &TaskId) -> Result<StatusReport, ClientError> {
        let url = self.endpoint(&[TASK_STATUS_SEGMENT, id.as_str()])?;
        tracing::trace!("Fetching status from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::from_transport(url.as_str(), &e))?;

        let status = response.status();
        let body = read_body(url.as_str(), response).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                id: id.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let parsed: TaskStatusResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))?;

        let reported_id = parsed
            .id
            .or(parsed.task_id)
            .map(TaskId::new)
            .unwrap_or_else(|| id.clone());

        Ok(StatusReport {
            id: reported_id,
            status: parsed.status,
            start_url: parsed.start_url,
            visited_urls: parsed.visited_urls.unwrap_or_default(),
            result: parsed.crawled_data.filter(|data| !data.is_empty()),
        })
    }
}

async fn read_body(url: &str, response: Response) -> Result<String, ClientError> {
    response
        .text()
        .await
        .map_err(|e| ClientError::from_transport(url, &e))
}

/// Extracts a human-readable message from an error response body
///
/// Prefers the `error` field, then `detail`, then the raw body, then the
/// status code's reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    if let Some(error) = parsed.error {
        return error;
    }

    match parsed.detail {
        Some(serde_json::Value::String(detail)) => return detail,
        Some(other) => return other.to_string(),
        None => {}
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}
