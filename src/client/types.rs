//! Task and status types shared by the client and the orchestrator

use crate::url::TaskSeed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque backend-assigned task identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A submitted task: the backend id plus the seed it was started from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskHandle {
    pub id: TaskId,
    pub seed: TaskSeed,
}

/// Status of a task as reported by the backend
///
/// Only `Completed` and `Failed` are terminal. Any status string the backend
/// sends that is not one of the known values is kept as `Other` and treated
/// as still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Initiated,
    InProgress,
    Completed,
    Failed,
    Other(String),
}

impl TaskStatus {
    /// Returns true if no further status changes will follow
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            Self::Initiated => "initiated",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "initiated" => Self::Initiated,
            "in_progress" | "in-progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crawl output: each visited URL mapped to the links discovered on it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrawlResult(BTreeMap<String, Vec<String>>);

impl CrawlResult {
    pub fn new(pages: BTreeMap<String, Vec<String>>) -> Self {
        Self(pages)
    }

    /// Number of visited pages
    pub fn page_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of discovered links across all pages
    pub fn link_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Links discovered on `page`, if it was visited
    pub fn links_for(&self, page: &str) -> Option<&[String]> {
        self.0.get(page).map(Vec::as_slice)
    }

    pub fn pages(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Vec<String>)> for CrawlResult {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Backend acknowledgement of a submitted task
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitAck {
    pub handle: TaskHandle,
    pub status: TaskStatus,
    /// Free-form message from the backend (e.g. which algorithm was chosen)
    pub message: Option<String>,
}

/// Normalized answer to a status query
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub id: TaskId,
    pub status: TaskStatus,
    pub start_url: Option<String>,
    pub visited_urls: Vec<String>,
    /// Crawl output; present only when the backend returned a non-empty map
    pub result: Option<CrawlResult>,
}
