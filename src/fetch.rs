//! Catalog fetch hook with offline fallback
//!
//! `Fetcher` runs one load: probe connectivity, then either GET the catalog and
//! cache the raw body, or fall back to the cached body. `FetchHandle` is the
//! surface the view consumes: it owns the published `FetchResult` and starts a
//! new run whenever the URL changes.
//!
//! Runs are never cancelled. By default a superseded run still publishes when it
//! completes, so the last run to *finish* wins. `RacePolicy::LatestRequest`
//! changes that: each run is tagged with a sequence number and results from
//! anything but the newest run are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::{KeyValueStore, StoreError, CACHE_KEY};
use crate::data::{parse_items, FetchResult, Item, Transport, TransportError};
use crate::network::{NetworkProbe, ProbeError};

/// Message used when a failure carries no text of its own
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that end a run
#[derive(Debug, Error)]
pub enum FetchError {
    /// Offline and nothing cached
    #[error("No internet and no cached data available")]
    Offline,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body (network or cached) was not a JSON array of records
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

/// Where a successful run got its items from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fresh response from the catalog endpoint
    Network,
    /// Device offline, served from the cached body
    OfflineCache,
}

/// How overlapping runs are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RacePolicy {
    /// Every run publishes; the last to complete wins
    #[default]
    LastCompleted,
    /// Only the most recently started run publishes
    LatestRequest,
}

/// Text shown to the view for a failed run
pub fn error_message(err: &FetchError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// Where a run publishes its state changes
struct RunSlot<'a> {
    state: &'a watch::Sender<FetchResult>,
    /// `(this run's sequence number, latest sequence number)`; `None` means untagged
    ticket: Option<(u64, &'a AtomicU64)>,
}

impl RunSlot<'_> {
    fn is_current(&self) -> bool {
        match self.ticket {
            Some((seq, latest)) => latest.load(Ordering::SeqCst) == seq,
            None => true,
        }
    }

    fn publish(&self, update: impl FnOnce(&mut FetchResult)) {
        if self.is_current() {
            self.state.send_modify(update);
        } else if let Some((seq, _)) = self.ticket {
            tracing::debug!(seq, "dropping update from superseded run");
        }
    }
}

/// Clears `loading` when the run ends, on every exit path
struct LoadingGuard<'a, 'b> {
    slot: &'a RunSlot<'b>,
}

impl Drop for LoadingGuard<'_, '_> {
    fn drop(&mut self) {
        self.slot.publish(|s| s.loading = false);
    }
}

/// Loads the catalog from the network or the offline cache
#[derive(Clone)]
pub struct Fetcher {
    probe: Arc<dyn NetworkProbe>,
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
}

impl Fetcher {
    pub fn new(
        probe: impl NetworkProbe + 'static,
        store: impl KeyValueStore + 'static,
        transport: impl Transport + 'static,
    ) -> Self {
        Self::from_shared(Arc::new(probe), Arc::new(store), Arc::new(transport))
    }

    /// Builds a fetcher from already type-erased collaborators
    pub fn from_shared(
        probe: Arc<dyn NetworkProbe>,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            probe,
            store,
            transport,
        }
    }

    /// Resolves the items for `url` without touching any view state
    pub async fn load(&self, url: &str) -> Result<(Vec<Item>, FetchOutcome), FetchError> {
        if self.probe.is_connected().await? {
            let body = self.transport.get(url).await?;
            let items = parse_items(&body)?;
            self.store.set(CACHE_KEY, &body).await?;
            tracing::info!(%url, items = items.len(), "catalog fetched and cached");
            return Ok((items, FetchOutcome::Network));
        }

        match self.store.get(CACHE_KEY).await? {
            Some(cached) => {
                let items = parse_items(&cached)?;
                tracing::info!(%url, items = items.len(), "offline, serving cached catalog");
                Ok((items, FetchOutcome::OfflineCache))
            }
            None => {
                tracing::warn!(%url, "offline with empty cache");
                Err(FetchError::Offline)
            }
        }
    }

    /// Runs one load for `url`, publishing progress into `state`
    ///
    /// Sets `loading` and clears `error` on entry. On success `data` is
    /// replaced; on failure `error` is set and `data` is left alone. `loading`
    /// is cleared exactly once when the run ends.
    pub async fn run(
        &self,
        url: &str,
        state: &watch::Sender<FetchResult>,
    ) -> Result<FetchOutcome, FetchError> {
        let slot = RunSlot {
            state,
            ticket: None,
        };
        self.run_in(url, &slot).await
    }

    async fn run_in(&self, url: &str, slot: &RunSlot<'_>) -> Result<FetchOutcome, FetchError> {
        slot.publish(|s| {
            s.loading = true;
            s.error = None;
        });
        let _loading = LoadingGuard { slot };

        match self.load(url).await {
            Ok((items, outcome)) => {
                slot.publish(|s| s.data = items);
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(%url, error = %err, "catalog load failed");
                let message = error_message(&err);
                slot.publish(|s| s.error = Some(message));
                Err(err)
            }
        }
    }
}

/// The consumable fetch hook: current `FetchResult` for a URL
///
/// Creating a handle starts the first run immediately; it must be created
/// inside a tokio runtime.
pub struct FetchHandle {
    fetcher: Fetcher,
    url: String,
    policy: RacePolicy,
    state: Arc<watch::Sender<FetchResult>>,
    latest: Arc<AtomicU64>,
    pending: Vec<JoinHandle<()>>,
}

impl FetchHandle {
    pub fn new(fetcher: Fetcher, url: impl Into<String>) -> Self {
        Self::with_policy(fetcher, url, RacePolicy::default())
    }

    pub fn with_policy(fetcher: Fetcher, url: impl Into<String>, policy: RacePolicy) -> Self {
        let (state, _) = watch::channel(FetchResult::default());
        let mut handle = Self {
            fetcher,
            url: url.into(),
            policy,
            state: Arc::new(state),
            latest: Arc::new(AtomicU64::new(0)),
            pending: Vec::new(),
        };
        handle.spawn_run();
        handle
    }

    /// URL the most recent run was started for
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> RacePolicy {
        self.policy
    }

    /// Switches to `url`, starting a new run if it differs from the current one
    ///
    /// Returns whether a run was started.
    pub fn set_url(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if url == self.url {
            return false;
        }
        self.url = url;
        self.spawn_run();
        true
    }

    /// Starts a fresh run for the current URL
    pub fn reload(&mut self) {
        self.spawn_run();
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FetchResult {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<FetchResult> {
        self.state.subscribe()
    }

    /// Waits for every run started so far to finish
    pub async fn settle(&mut self) {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "fetch task ended abnormally");
            }
        }
    }

    fn spawn_run(&mut self) {
        self.pending.retain(|task| !task.is_finished());

        // Visible to readers before the task is first polled
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let fetcher = self.fetcher.clone();
        let url = self.url.clone();
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.latest);
        let policy = self.policy;

        tracing::debug!(seq, %url, ?policy, "starting catalog run");
        self.pending.push(tokio::spawn(async move {
            let ticket = match policy {
                RacePolicy::LastCompleted => None,
                RacePolicy::LatestRequest => Some((seq, latest.as_ref())),
            };
            let slot = RunSlot {
                state: state.as_ref(),
                ticket,
            };
            // Failures are already published into the state
            let _ = fetcher.run_in(&url, &slot).await;
        }));
    }
}
