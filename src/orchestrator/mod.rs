//! Task orchestrator: owns the lifecycle of "the current task"
//!
//! ```text
//! Idle --start(seed)--> Starting
//! Starting --submit ok--> Polling
//! Starting --submit fails--> Failed(no handle)
//! Polling --status: not terminal--> Polling (next poll after a fixed interval)
//! Polling --status: completed--> Completed
//! Polling --status: failed--> Failed(handle, BackendTaskFailure)
//! Polling --fetch error--> Failed(handle)
//! (any) --start(new seed)--> Starting (prior lifecycle cancelled first)
//! ```
//!
//! Only one lifecycle is ever live. Each `start` bumps a [`Generation`] and
//! cancels the previous lifecycle's token; any result from an older
//! generation that still arrives is discarded. Subscribers read snapshots
//! through a watch channel (latest state) or a broadcast channel (every
//! transition); they never mutate orchestrator state.

mod generation;
mod lifecycle;
mod snapshot;

pub use generation::Generation;
pub use snapshot::{TaskSnapshot, Transition};

use crate::client::TaskClient;
use crate::config::{PollerConfig, DEFAULT_POLL_INTERVAL_MS};
use crate::url::TaskSeed;
use crate::ValidationError;
use lifecycle::{Lifecycle, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

/// Buffered transitions per broadcast subscriber
const EVENT_CAPACITY: usize = 256;

/// Polling policy for a lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Fixed delay before each status fetch
    pub poll_interval: Duration,
    /// Fail with `Timeout` after this many non-terminal polls (`None` = never)
    pub max_polls: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_polls: None,
        }
    }
}

impl From<&PollerConfig> for PollSettings {
    fn from(config: &PollerConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: (config.max_polls > 0).then_some(config.max_polls),
        }
    }
}

/// Drives one crawl task at a time against a [`TaskClient`]
///
/// `start` and `stop` spawn and cancel tokio tasks, so they must be called
/// from within a Tokio runtime. Dropping the orchestrator cancels whatever
/// lifecycle is in flight.
///
/// # Example
///
/// ```no_run
/// use crawl_watch::config::BackendConfig;
/// use crawl_watch::{HttpTaskClient, Orchestrator, PollSettings};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpTaskClient::new(&BackendConfig::default())?;
/// let orchestrator = Orchestrator::new(client, PollSettings::default());
///
/// orchestrator.start("https://example.com")?;
/// let finished = orchestrator.wait_for_terminal().await;
/// println!("{:?}", finished);
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<C> {
    client: Arc<C>,
    settings: PollSettings,
    shared: Arc<Shared>,
}

impl<C: TaskClient + 'static> Orchestrator<C> {
    /// Creates an idle orchestrator
    pub fn new(client: C, settings: PollSettings) -> Self {
        Self::with_shared_client(Arc::new(client), settings)
    }

    /// Creates an idle orchestrator around a client that is shared elsewhere
    pub fn with_shared_client(client: Arc<C>, settings: PollSettings) -> Self {
        Self {
            client,
            settings,
            shared: Arc::new(Shared::new(EVENT_CAPACITY)),
        }
    }

    /// Starts a new task for `input`, superseding any task in flight
    ///
    /// The seed is validated synchronously. A rejected seed returns a
    /// [`ValidationError`] and leaves the snapshot, the generation, and the
    /// running lifecycle untouched; no request is made.
    ///
    /// On success the previous lifecycle is cancelled, the snapshot becomes
    /// `Starting`, and the generation of the new lifecycle is returned.
    pub fn start(&self, input: &str) -> Result<Generation, ValidationError> {
        let seed = TaskSeed::parse(input).map_err(|e| {
            tracing::warn!("Refusing to start: {}", e);
            e
        })?;

        let (generation, cancel) = {
            let mut current = self.shared.lock();
            current.cancel.cancel();
            current.generation = current.generation.next();
            current.cancel = CancellationToken::new();

            self.shared
                .publish_locked(&current, TaskSnapshot::Starting { seed: seed.clone() });

            (current.generation, current.cancel.clone())
        };

        tracing::info!("Starting lifecycle {} for {}", generation, seed);

        let lifecycle = Lifecycle {
            client: Arc::clone(&self.client),
            shared: Arc::clone(&self.shared),
            settings: self.settings,
            generation,
            cancel,
            seed,
        };
        tokio::spawn(lifecycle.run());

        Ok(generation)
    }

    /// Cancels the lifecycle in flight, if any
    ///
    /// The generation is bumped so nothing from the cancelled lifecycle can
    /// land afterwards. The snapshot itself is left as it was.
    pub fn stop(&self) {
        let generation = self.shared.retire();
        tracing::debug!("Stopped; generation is now {}", generation);
    }

    /// Returns the current snapshot
    pub fn snapshot(&self) -> TaskSnapshot {
        self.shared.snapshot()
    }

    /// Returns the current generation
    pub fn generation(&self) -> Generation {
        self.shared.lock().generation
    }

    /// Subscribes to the latest snapshot
    ///
    /// A watch receiver always sees the most recent state; intermediate
    /// states may be skipped by a slow reader. Use [`Orchestrator::events`]
    /// to observe every transition.
    pub fn subscribe(&self) -> watch::Receiver<TaskSnapshot> {
        self.shared.subscribe()
    }

    /// Subscribes to every snapshot transition, tagged with its generation
    pub fn events(&self) -> broadcast::Receiver<Transition> {
        self.shared.events()
    }

    /// Waits until the current lifecycle reaches a terminal snapshot
    ///
    /// Returns `None` if there is no task, or if the lifecycle is superseded
    /// or stopped before it finishes.
    pub async fn wait_for_terminal(&self) -> Option<TaskSnapshot> {
        let cancel = self.shared.lock().cancel.clone();
        let mut rx = self.subscribe();

        if matches!(*rx.borrow(), TaskSnapshot::Idle) {
            return None;
        }

        tokio::select! {
            biased;
            result = rx.wait_for(TaskSnapshot::is_terminal) => {
                result.ok().map(|snapshot| snapshot.clone())
            }
            _ = cancel.cancelled() => None,
        }
    }
}

impl<C> Drop for Orchestrator<C> {
    fn drop(&mut self) {
        self.shared.retire();
    }
}
