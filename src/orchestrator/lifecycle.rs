//! One task lifecycle: submit, then poll on a fixed interval until terminal
//!
//! A lifecycle runs as its own tokio task and owns a cancellation token.
//! Every suspension point (submit, timer, status fetch) races against that
//! token, and every snapshot it produces is applied only if its generation
//! is still the current one.

use super::{Generation, PollSettings, TaskSnapshot, Transition};
use crate::client::{ClientError, ErrorKind, StatusReport, TaskClient, TaskHandle, TaskStatus};
use crate::url::TaskSeed;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

/// Generation and cancellation token of the current lifecycle
pub(super) struct Current {
    pub(super) generation: Generation,
    pub(super) cancel: CancellationToken,
}

/// State shared between the orchestrator and its lifecycle task
pub(super) struct Shared {
    current: Mutex<Current>,
    snapshot_tx: watch::Sender<TaskSnapshot>,
    event_tx: broadcast::Sender<Transition>,
}

impl Shared {
    pub(super) fn new(event_capacity: usize) -> Self {
        let (snapshot_tx, _rx) = watch::channel(TaskSnapshot::Idle);
        let (event_tx, _rx) = broadcast::channel(event_capacity);

        Self {
            current: Mutex::new(Current {
                generation: Generation::default(),
                cancel: CancellationToken::new(),
            }),
            snapshot_tx,
            event_tx,
        }
    }

    /// Locks the current lifecycle record
    ///
    /// The lock is never held across an `.await`.
    pub(super) fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn snapshot(&self) -> TaskSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub(super) fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub(super) fn events(&self) -> broadcast::Receiver<Transition> {
        self.event_tx.subscribe()
    }

    /// Publishes `snapshot` while the caller already holds the lock
    pub(super) fn publish_locked(&self, current: &Current, snapshot: TaskSnapshot) {
        tracing::debug!("Lifecycle {} -> {}", current.generation, snapshot.label());

        self.snapshot_tx.send_replace(snapshot.clone());

        // No subscribers is fine; the event is simply dropped
        self.event_tx
            .send(Transition {
                generation: current.generation,
                snapshot,
            })
            .ok();
    }

    /// Cancels the current lifecycle and bumps the generation
    ///
    /// Returns the new generation. Nothing tagged with an older generation
    /// can be published afterwards.
    pub(super) fn retire(&self) -> Generation {
        let mut current = self.lock();
        current.cancel.cancel();
        current.generation = current.generation.next();
        current.generation
    }

    /// Publishes `snapshot` if `generation` is still current
    ///
    /// Returns false (and drops the snapshot) for a stale generation.
    pub(super) fn publish(&self, generation: Generation, snapshot: TaskSnapshot) -> bool {
        let current = self.lock();
        if current.generation != generation {
            tracing::debug!(
                "Discarding {} update from stale lifecycle {} (current is {})",
                snapshot.label(),
                generation,
                current.generation
            );
            return false;
        }

        self.publish_locked(&current, snapshot);
        true
    }
}

/// Everything a lifecycle task needs, moved into the spawned future
pub(super) struct Lifecycle<C> {
    pub(super) client: Arc<C>,
    pub(super) shared: Arc<Shared>,
    pub(super) settings: PollSettings,
    pub(super) generation: Generation,
    pub(super) cancel: CancellationToken,
    pub(super) seed: TaskSeed,
}

impl<C: TaskClient> Lifecycle<C> {
    /// Drives the lifecycle to a terminal snapshot, or until cancelled
    pub(super) async fn run(self) {
        let Some(handle) = self.submit().await else {
            return;
        };

        let mut polls: u32 = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Lifecycle {} cancelled while waiting to poll", self.generation);
                    return;
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }

            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Lifecycle {} cancelled during status fetch", self.generation);
                    return;
                }
                result = self.client.fetch_status(&handle.id) => result,
            };

            polls = polls.saturating_add(1);
            let next = self.next_snapshot(&handle, polls, fetched);
            let terminal = next.is_terminal();

            if !self.shared.publish(self.generation, next) || terminal {
                return;
            }
        }
    }

    /// Submits the seed; publishes `Polling` on success or `Failed` on error
    async fn submit(&self) -> Option<TaskHandle> {
        let submitted = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("Lifecycle {} cancelled during submission", self.generation);
                return None;
            }
            result = self.client.submit(&self.seed) => result,
        };

        match submitted {
            Ok(ack) => {
                tracing::info!("Task {} accepted for {}", ack.handle.id, self.seed);
                if let Some(message) = &ack.message {
                    tracing::debug!("Backend says: {}", message);
                }

                let handle = ack.handle;
                let polling = TaskSnapshot::Polling {
                    handle: handle.clone(),
                    last_status: Some(ack.status),
                    polls: 0,
                };

                self.shared
                    .publish(self.generation, polling)
                    .then_some(handle)
            }
            Err(e) => {
                tracing::warn!("Submission failed for {}: {}", self.seed, e);
                self.shared.publish(
                    self.generation,
                    TaskSnapshot::Failed {
                        handle: None,
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                );
                None
            }
        }
    }

    /// Maps one status fetch outcome onto the next snapshot
    fn next_snapshot(
        &self,
        handle: &TaskHandle,
        polls: u32,
        fetched: Result<StatusReport, ClientError>,
    ) -> TaskSnapshot {
        let report = match fetched {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Status fetch for task {} failed: {}", handle.id, e);
                return TaskSnapshot::Failed {
                    handle: Some(handle.clone()),
                    kind: e.kind(),
                    message: e.to_string(),
                };
            }
        };

        tracing::debug!(
            "Task {} poll {}: {} ({} pages visited)",
            handle.id,
            polls,
            report.status,
            report.visited_urls.len()
        );

        match report.status {
            TaskStatus::Completed => {
                let result = report.result.unwrap_or_default();
                tracing::info!(
                    "Task {} completed: {} pages, {} links",
                    handle.id,
                    result.page_count(),
                    result.link_count()
                );
                TaskSnapshot::Completed {
                    handle: handle.clone(),
                    result,
                }
            }
            TaskStatus::Failed => {
                tracing::warn!("Backend reports task {} failed", handle.id);
                TaskSnapshot::Failed {
                    handle: Some(handle.clone()),
                    kind: ErrorKind::BackendTaskFailure,
                    message: format!("Backend reported that task {} failed", handle.id),
                }
            }
            status => match self.settings.max_polls {
                Some(limit) if polls >= limit => {
                    tracing::warn!(
                        "Task {} still {} after {} polls, giving up",
                        handle.id,
                        status,
                        polls
                    );
                    TaskSnapshot::Failed {
                        handle: Some(handle.clone()),
                        kind: ErrorKind::Timeout,
                        message: format!(
                            "Task {} still '{}' after {} polls",
                            handle.id, status, polls
                        ),
                    }
                }
                _ => TaskSnapshot::Polling {
                    handle: handle.clone(),
                    last_status: Some(status),
                    polls,
                },
            },
        }
    }
}
