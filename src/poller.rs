//! Background refresh loop for one cache key.
//!
//! [`GamePoller`] owns a spawned task that fetches the key's snapshot right
//! away and then once per [`poll_interval`](crate::ClientConfig::poll_interval),
//! offering each result to the shared [`GameCache`]. A failed tick is
//! reported and the loop carries on. Events go out on a bounded channel
//! returned from [`GamePoller::spawn`].
//!
//! # Example
//!
//! ```rust,ignore
//! let (mut poller, mut events) = GamePoller::spawn(api, cache.clone(), key.clone(), &config);
//! while let Some(event) = events.recv().await {
//!     if let PollEvent::Updated { .. } = event {
//!         render(cache.snapshot(&key));
//!     }
//! }
//! poller.shutdown().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::api::GameApi;
use crate::cache::{CacheKey, GameCache, Stamp, WriteOutcome};
use crate::config::ClientConfig;
use crate::error::{Operation, SequenceError};

/// What happened on one poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A fresh snapshot was committed at `version`.
    Updated { version: Stamp },
    /// The fetch failed; the previous snapshot is kept.
    Failed { message: String },
    /// The response lost to a newer write and was dropped.
    Stale { stamp: Stamp },
}

/// Result of one fetch offered to the cache.
#[derive(Debug)]
pub(crate) struct Refreshed {
    pub(crate) stamp: Stamp,
    pub(crate) outcome: WriteOutcome,
    pub(crate) error: Option<SequenceError>,
}

impl Refreshed {
    fn into_event(self) -> PollEvent {
        match (self.outcome, self.error) {
            (WriteOutcome::Stale, _) => PollEvent::Stale { stamp: self.stamp },
            (WriteOutcome::Applied, None) => PollEvent::Updated {
                version: self.stamp,
            },
            (WriteOutcome::Applied, Some(e)) => PollEvent::Failed {
                message: e.banner_message(),
            },
        }
    }
}

/// Cancels its fetch in the cache unless disarmed first.
struct InFlight<'a> {
    cache: &'a GameCache,
    key: &'a CacheKey,
    stamp: Stamp,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.cancel_fetch(self.key, self.stamp);
        }
    }
}

/// Fetch `key` once, stamped at issue, and offer the result to `cache`.
///
/// An empty body counts as a failure. Dropping the future before it
/// resolves takes the entry back out of `Fetching`.
pub(crate) async fn refresh<A: GameApi + ?Sized>(
    api: &A,
    cache: &GameCache,
    key: &CacheKey,
) -> Refreshed {
    let stamp = cache.begin_fetch(key);
    let mut in_flight = InFlight {
        cache,
        key,
        stamp,
        armed: true,
    };
    let response = match key.private_player_uuid() {
        Some(private) => api.fetch_as_player(&key.game_uuid, private).await,
        None => api.fetch_as_viewer(&key.game_uuid).await,
    };
    let response = response.and_then(|body| {
        body.ok_or(SequenceError::EmptyResponse {
            operation: Operation::FetchGame,
        })
    });
    in_flight.armed = false;
    let (outcome, error) = match response {
        Ok(snapshot) => (cache.complete_fetch(key, stamp, Ok(snapshot)), None),
        Err(e) => (cache.complete_fetch(key, stamp, Err(&e)), Some(e)),
    };
    Refreshed {
        stamp,
        outcome,
        error,
    }
}

/// Handle to a running refresh loop.
///
/// Dropping the handle aborts the loop; [`shutdown`](Self::shutdown) stops it
/// gracefully.
pub struct GamePoller {
    key: CacheKey,
    task: Option<tokio::task::JoinHandle<()>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    shutdown_timeout: Duration,
}

impl GamePoller {
    /// Start polling `key` and return the handle plus event receiver.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "dropping the poller stops polling immediately"]
    pub fn spawn<A: GameApi>(
        api: Arc<A>,
        cache: Arc<GameCache>,
        key: CacheKey,
        config: &ClientConfig,
    ) -> (Self, mpsc::Receiver<PollEvent>) {
        // tokio panics on a zero capacity.
        let capacity = config.event_channel_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel::<PollEvent>(capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(poll_loop(
            api,
            cache,
            key.clone(),
            config.poll_interval,
            event_tx,
            shutdown_rx,
        ));

        let poller = Self {
            key,
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
            shutdown_timeout: config.shutdown_timeout,
        };
        (poller, event_rx)
    }

    /// The key being refreshed.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// `true` until the loop has been stopped.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop, aborting it if it does not exit within the shutdown
    /// timeout. The event receiver yields `None` afterwards.
    pub async fn shutdown(&mut self) {
        debug!(game = %self.key.game_uuid, "poller shutdown requested");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!("poll loop terminated with join error: {join_err}");
                }
                Err(_) => {
                    warn!("poll loop did not exit within timeout; aborting task");
                    task.abort();
                    if let Err(join_err) = task.await {
                        debug!("poll loop aborted: {join_err}");
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for GamePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamePoller")
            .field("key", &self.key)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Drop for GamePoller {
    fn drop(&mut self) {
        // No executor to await a graceful stop here.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ── Poll loop ───────────────────────────────────────────────────────

/// Exits on the shutdown signal, which also cancels an in-flight fetch.
async fn poll_loop<A: GameApi>(
    api: Arc<A>,
    cache: Arc<GameCache>,
    key: CacheKey,
    interval: Duration,
    event_tx: mpsc::Sender<PollEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    debug!(game = %key.game_uuid, "poll loop started");

    // The first tick completes immediately.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown_rx => {
                debug!("shutdown signal received");
                break;
            }

            _ = ticker.tick() => {
                let refreshed = tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        debug!("shutdown signal received during fetch");
                        break;
                    }
                    refreshed = refresh(api.as_ref(), &cache, &key) => refreshed,
                };
                if let Some(e) = &refreshed.error {
                    if refreshed.outcome == WriteOutcome::Applied {
                        warn!(game = %key.game_uuid, "poll failed: {e}");
                    }
                }
                emit_event(&event_tx, refreshed.into_event());
            }
        }
    }

    debug!(game = %key.game_uuid, "poll loop exited");
}

/// Send without blocking; a full channel drops the event with a warning.
fn emit_event(event_tx: &mpsc::Sender<PollEvent>, event: PollEvent) {
    match event_tx.try_send(event) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(dropped)) => {
            warn!("poll event channel full, dropping event: {dropped:?}");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            debug!("poll event channel closed, receiver dropped");
        }
    }
}
