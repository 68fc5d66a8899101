//! Polling scheduler for the download list.
//!
//! The poller owns the canonical [`DownloadSet`]. Every tick spawns one fetch;
//! fetches are never queued behind each other, so several can be in flight.
//! Their results come back over a channel to the single loop task, which is
//! the only place merges happen.
//!
//! # Lifecycle
//!
//! `Idle` → `Polling` via [`DownloadPoller::start_when_ready`] (or
//! [`DownloadPoller::start`]), `Polling` → `Stopped` via [`PollHandle::stop`]
//! or by dropping the handle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::Download;
use crate::ports::{ApiResult, DownloadFeedPort, FeatureFlags, ReadinessSignal};
use crate::reconcile::{DownloadSet, StatusFlags};

use super::scope::DownloadScope;

/// Default delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for the download poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between fetches.
    pub(crate) interval: Duration,
    /// Drop results older than the most recently applied one.
    pub(crate) discard_stale: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            discard_stale: true,
        }
    }
}

impl PollerConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between fetches.
    ///
    /// Defaults to one second. Values below 10ms are raised to 10ms.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Whether to drop responses that resolve after a newer one was applied.
    ///
    /// Defaults to `true`. With `false`, results are applied in the order
    /// their fetches resolve, even if that means older data wins.
    #[must_use]
    pub const fn with_discard_stale(mut self, discard: bool) -> Self {
        self.discard_stale = discard;
        self
    }

    /// Delay between fetches.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Poller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// Created, waiting to start.
    Idle,
    /// Fetching on every tick.
    Polling,
    /// Torn down.
    Stopped,
}

/// What consumers render: the canonical set plus derived state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadsView {
    /// Downloads, newest first.
    pub downloads: Vec<Download>,
    /// Derived pause/running flags.
    pub status: StatusFlags,
    /// At least one fetch has been answered.
    pub retrieved: bool,
    /// Bumped every time the canonical set changes.
    pub revision: u64,
}

/// Result of asking the poller to start.
#[derive(Debug)]
pub enum StartOutcome {
    /// Polling is running; drop or stop the handle to tear it down.
    Polling(PollHandle),
    /// The download manager is disabled; the caller should navigate away.
    NavigateAway,
    /// The readiness signal went away before firing.
    Abandoned,
}

/// Idle poller, ready to start.
pub struct DownloadPoller {
    feed: Arc<dyn DownloadFeedPort>,
    scope: DownloadScope,
    config: PollerConfig,
    views: watch::Sender<DownloadsView>,
}

impl DownloadPoller {
    /// Create an idle poller.
    pub fn new(feed: Arc<dyn DownloadFeedPort>, scope: DownloadScope, config: PollerConfig) -> Self {
        let (views, _) = watch::channel(DownloadsView::default());
        Self {
            feed,
            scope,
            config,
            views,
        }
    }

    /// Subscribe to published views. Valid before and after start.
    pub fn subscribe(&self) -> watch::Receiver<DownloadsView> {
        self.views.subscribe()
    }

    /// Wait for readiness, check the feature flag, then start polling.
    ///
    /// With the download manager disabled no fetch is ever issued and the
    /// caller is told to navigate away.
    pub async fn start_when_ready(
        self,
        mut readiness: ReadinessSignal,
        flags: &dyn FeatureFlags,
    ) -> StartOutcome {
        if !readiness.wait().await {
            warn!("Readiness signal dropped before the service initialized");
            return StartOutcome::Abandoned;
        }

        if !flags.downloads_manager_enabled() {
            info!("Download manager is disabled; not polling");
            return StartOutcome::NavigateAway;
        }

        StartOutcome::Polling(self.start())
    }

    /// Start polling immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> PollHandle {
        let cancel = CancellationToken::new();
        let views = self.views.subscribe();
        let worker = PollLoop {
            feed: self.feed,
            scope: self.scope,
            config: self.config,
            views: self.views,
            set: DownloadSet::new(),
            retrieved: false,
            revision: 0,
            last_applied: None,
        };
        let task = tokio::spawn(worker.run(cancel.clone()));

        PollHandle {
            cancel,
            task: Some(task),
            views,
        }
    }
}

/// Owned handle to a running poller.
///
/// Dropping the handle stops polling.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    views: watch::Receiver<DownloadsView>,
}

impl PollHandle {
    /// Stop polling. Idempotent.
    ///
    /// Fetches already in flight are not cancelled; their results are
    /// discarded when they arrive.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!("Stopping download poller");
        }
        self.cancel.cancel();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PollerState {
        if self.cancel.is_cancelled() {
            PollerState::Stopped
        } else {
            PollerState::Polling
        }
    }

    /// A receiver for published views.
    pub fn views(&self) -> watch::Receiver<DownloadsView> {
        self.views.clone()
    }

    /// Stop polling and wait for the loop task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Download poller task ended abnormally");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One fetch's result, tagged with the order it was issued in.
struct Fetched {
    seq: u64,
    outcome: ApiResult<Option<Vec<Download>>>,
}

struct PollLoop {
    feed: Arc<dyn DownloadFeedPort>,
    scope: DownloadScope,
    config: PollerConfig,
    views: watch::Sender<DownloadsView>,
    set: DownloadSet,
    retrieved: bool,
    revision: u64,
    last_applied: Option<u64>,
}

impl PollLoop {
    async fn run(mut self, cancel: CancellationToken) {
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<Fetched>();
        // The first tick completes immediately, giving the fetch-on-entry.
        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut next_seq: u64 = 0;

        debug!(
            interval_ms = u64::try_from(self.config.interval.as_millis()).unwrap_or(u64::MAX),
            scoped = self.scope.is_subset(),
            "Starting download poller"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Download poller stopped");
                    break;
                }
                Some(fetched) = results_rx.recv() => self.apply(fetched),
                _ = ticker.tick() => {
                    self.spawn_fetch(next_seq, &results_tx, &cancel);
                    next_seq += 1;
                }
            }
        }
    }

    fn spawn_fetch(&self, seq: u64, results: &mpsc::UnboundedSender<Fetched>, cancel: &CancellationToken) {
        let feed = Arc::clone(&self.feed);
        let uids = self.scope.uids();
        let results = results.clone();
        let cancel = cancel.clone();

        tokio::spawn(async move {
            if cancel.is_cancelled() {
                return;
            }
            let outcome = feed.fetch_downloads(uids.as_deref()).await;
            // The loop is gone after teardown; a late result is dropped here.
            let _ = results.send(Fetched { seq, outcome });
        });
    }

    fn apply(&mut self, fetched: Fetched) {
        let Fetched { seq, outcome } = fetched;

        let snapshot = match outcome {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(seq, "Backend answered without a download list");
                self.mark_retrieved();
                return;
            }
            Err(e) => {
                debug!(seq, error = %e, "Download fetch failed; keeping current set");
                return;
            }
        };

        if self.config.discard_stale && self.last_applied.is_some_and(|last| seq < last) {
            debug!(seq, last_applied = ?self.last_applied, "Discarding stale download snapshot");
            return;
        }
        self.last_applied = Some(self.last_applied.map_or(seq, |last| last.max(seq)));

        if self.set.same_content(&snapshot) {
            self.mark_retrieved();
            return;
        }

        let report = self.set.reconcile(&snapshot);
        self.revision += 1;
        self.retrieved = true;
        debug!(
            seq,
            revision = self.revision,
            added = report.added.len(),
            removed = report.removed.len(),
            updated = report.updated,
            "Reconciled download snapshot"
        );
        self.publish();
    }

    fn mark_retrieved(&mut self) {
        if !self.retrieved {
            self.retrieved = true;
            self.publish();
        }
    }

    fn publish(&self) {
        self.views.send_replace(DownloadsView {
            downloads: self.set.to_vec(),
            status: self.set.status(),
            retrieved: self.retrieved,
            revision: self.revision,
        });
    }
}
