//! Externally observable task state

use super::Generation;
use crate::client::{CrawlResult, ErrorKind, TaskHandle, TaskStatus};
use crate::url::TaskSeed;
use serde::Serialize;

/// The state of the current task, as seen by subscribers
///
/// Exactly one snapshot is current at any instant. `Completed` and `Failed`
/// are terminal: only a fresh `start` moves away from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskSnapshot {
    /// No task submitted yet
    Idle,

    /// Submission request in flight
    Starting { seed: TaskSeed },

    /// Task accepted; status is being polled
    Polling {
        handle: TaskHandle,
        last_status: Option<TaskStatus>,
        /// Status fetches completed so far for this task
        polls: u32,
    },

    /// Backend reported completion
    Completed {
        handle: TaskHandle,
        result: CrawlResult,
    },

    /// Lifecycle ended in error; `handle` is absent if submission itself failed
    Failed {
        handle: Option<TaskHandle>,
        kind: ErrorKind,
        message: String,
    },
}

impl TaskSnapshot {
    /// Returns true for `Completed` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    /// Returns true while a lifecycle is in flight
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting { .. } | Self::Polling { .. })
    }

    /// The handle of the task this snapshot describes, if one was assigned
    pub fn handle(&self) -> Option<&TaskHandle> {
        match self {
            Self::Polling { handle, .. } | Self::Completed { handle, .. } => Some(handle),
            Self::Failed { handle, .. } => handle.as_ref(),
            Self::Idle | Self::Starting { .. } => None,
        }
    }

    /// Short name of the state, for logs and display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting { .. } => "starting",
            Self::Polling { .. } => "polling",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}

/// A snapshot change, tagged with the lifecycle that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub generation: Generation,
    pub snapshot: TaskSnapshot,
}
