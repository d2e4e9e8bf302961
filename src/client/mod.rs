//! Task client: the I/O boundary to the crawl backend
//!
//! Two single-shot operations, with no retry logic of their own:
//! - `submit` starts a new crawl task for a seed URL
//! - `fetch_status` reports the current status of a task by id
//!
//! Retry policy belongs to the caller. Both operations can be repeated with
//! the same arguments after a network failure.

mod error;
mod http;
mod types;

pub use error::{ClientError, ErrorKind};
pub use http::{build_http_client, HttpTaskClient};
pub use types::{CrawlResult, StatusReport, SubmitAck, TaskHandle, TaskId, TaskStatus};

use crate::url::TaskSeed;
use async_trait::async_trait;
use std::sync::Arc;

/// Abstraction over the crawl backend, enabling testability.
#[async_trait]
pub trait TaskClient: Send + Sync {
    /// Starts a crawl task for `seed`
    async fn submit(&self, seed: &TaskSeed) -> Result<SubmitAck, ClientError>;

    /// Fetches the current status of task `id`
    async fn fetch_status(&self, id: &TaskId) -> Result<StatusReport, ClientError>;
}

#[async_trait]
impl<T: TaskClient + ?Sized> TaskClient for Arc<T> {
    async fn submit(&self, seed: &TaskSeed) -> Result<SubmitAck, ClientError> {
        (**self).submit(seed).await
    }

    async fn fetch_status(&self, id: &TaskId) -> Result<StatusReport, ClientError> {
        (**self).fetch_status(id).await
    }
}
