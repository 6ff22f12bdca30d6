//! Versioned snapshot cache shared by the polling loop and mutations.
//!
//! Every write carries a [`Stamp`] drawn from one monotonic counter. A poll is
//! stamped when it is issued; a mutation response is stamped when it is
//! received. A write is applied only if its stamp is greater than the one
//! already committed for its key, so a poll that was in flight while a move
//! landed can never roll the board back.
//!
//! ```text
//!            begin_fetch              complete_fetch(Ok)
//!   Idle ─────────────────▶ Fetching ───────────────────▶ Ready
//!                              │  ▲                          │
//!        complete_fetch(Err)   │  └──────── begin_fetch ─────┘
//!                              ▼
//!                            Error ─── begin_fetch ──▶ Fetching
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SequenceError;
use crate::protocol::{GameResponse, GameUuid, PlayerUuid};

/// Position of a write in the cache's global order. Zero means "never written".
pub type Stamp = u64;

/// Whose view of a game is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerKey {
    /// A seated player, by private identifier.
    Player(PlayerUuid),
    /// A read-only viewer.
    Viewer,
}

/// Viewer and player views of a game are cached apart: only the player's
/// carries a hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub game_uuid: GameUuid,
    pub viewer: ViewerKey,
}

impl CacheKey {
    pub fn player(game_uuid: impl Into<GameUuid>, private_player_uuid: impl Into<PlayerUuid>) -> Self {
        Self {
            game_uuid: game_uuid.into(),
            viewer: ViewerKey::Player(private_player_uuid.into()),
        }
    }

    pub fn viewer(game_uuid: impl Into<GameUuid>) -> Self {
        Self {
            game_uuid: game_uuid.into(),
            viewer: ViewerKey::Viewer,
        }
    }

    /// Key for a route's optional private identifier.
    pub fn for_route(game_uuid: &str, private_player_uuid: Option<&str>) -> Self {
        match private_player_uuid {
            Some(private) => Self::player(game_uuid, private),
            None => Self::viewer(game_uuid),
        }
    }

    pub fn private_player_uuid(&self) -> Option<&str> {
        match &self.viewer {
            ViewerKey::Player(private) => Some(private),
            ViewerKey::Viewer => None,
        }
    }
}

/// Where a key is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Fetching,
    Ready,
    /// The last committed fetch failed. Polling carries on.
    Error,
}

/// What the cache holds for one key.
#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    /// The newest applied snapshot. Kept across failed fetches.
    pub snapshot: Option<Arc<GameResponse>>,
    pub state: FetchState,
    /// Stamp of the last applied write.
    pub version: Stamp,
    /// Banner text of the last applied failure, cleared by the next success.
    pub last_error: Option<String>,
    /// Stamp of the newest fetch issued and not yet settled.
    in_flight: Option<Stamp>,
}

impl CacheEntry {
    /// Leave `Fetching` for whatever the committed data says.
    fn settle(&mut self) {
        if self.state == FetchState::Fetching {
            self.state = if self.last_error.is_some() {
                FetchState::Error
            } else if self.snapshot.is_some() {
                FetchState::Ready
            } else {
                FetchState::Idle
            };
        }
    }
}

/// Result of offering a write to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// A newer write was already committed; this one was dropped.
    Stale,
}

#[derive(Debug, Default)]
struct Inner {
    last_stamp: Stamp,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl Inner {
    fn next_stamp(&mut self) -> Stamp {
        self.last_stamp = self.last_stamp.saturating_add(1);
        self.last_stamp
    }
}

/// Snapshot cache keyed by `(game, viewer)`. Share it behind an [`Arc`].
#[derive(Debug, Default)]
pub struct GameCache {
    inner: Mutex<Inner>,
}

impl GameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as fetching and stamp the request being issued.
    pub fn begin_fetch(&self, key: &CacheKey) -> Stamp {
        let mut inner = self.lock();
        let stamp = inner.next_stamp();
        let entry = inner.entries.entry(key.clone()).or_default();
        entry.state = FetchState::Fetching;
        entry.in_flight = Some(stamp);
        stamp
    }

    /// Forget the fetch stamped `stamp`, which will never complete.
    ///
    /// Only the newest issued fetch moves the entry out of `Fetching`.
    pub fn cancel_fetch(&self, key: &CacheKey, stamp: Stamp) {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(key) else {
            return;
        };
        if entry.in_flight == Some(stamp) {
            entry.in_flight = None;
            entry.settle();
            tracing::debug!(game = %key.game_uuid, stamp, state = ?entry.state, "fetch cancelled");
        }
    }

    /// Offer the outcome of the fetch stamped `stamp`.
    ///
    /// A failure keeps the previous snapshot and records its banner message.
    pub fn complete_fetch(
        &self,
        key: &CacheKey,
        stamp: Stamp,
        result: Result<GameResponse, &SequenceError>,
    ) -> WriteOutcome {
        let mut inner = self.lock();
        let entry = inner.entries.entry(key.clone()).or_default();
        if entry.in_flight == Some(stamp) {
            entry.in_flight = None;
        }
        if stamp <= entry.version {
            tracing::debug!(
                game = %key.game_uuid,
                stamp,
                committed = entry.version,
                ok = result.is_ok(),
                "cache write dropped (stale)"
            );
            return WriteOutcome::Stale;
        }
        entry.version = stamp;
        match result {
            Ok(snapshot) => {
                entry.snapshot = Some(Arc::new(snapshot));
                entry.state = FetchState::Ready;
                entry.last_error = None;
            }
            Err(e) => {
                entry.state = FetchState::Error;
                entry.last_error = Some(e.banner_message());
            }
        }
        WriteOutcome::Applied
    }

    /// Store a mutation's response. Always applied, since it is stamped on
    /// receipt and so is newer than anything already committed.
    pub fn write_through(&self, key: &CacheKey, snapshot: impl Into<Arc<GameResponse>>) -> Stamp {
        let mut inner = self.lock();
        let stamp = inner.next_stamp();
        let entry = inner.entries.entry(key.clone()).or_default();
        entry.version = stamp;
        entry.snapshot = Some(snapshot.into());
        entry.state = FetchState::Ready;
        entry.last_error = None;
        tracing::debug!(game = %key.game_uuid, stamp, "cache write-through");
        stamp
    }

    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.lock().entries.get(key).cloned()
    }

    /// The newest snapshot for `key`, if any.
    pub fn snapshot(&self, key: &CacheKey) -> Option<Arc<GameResponse>> {
        self.lock()
            .entries
            .get(key)
            .and_then(|entry| entry.snapshot.clone())
    }

    /// Forget `key`. Stop its poller first: a fetch completing afterwards
    /// recreates the entry.
    pub fn remove(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.lock().entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // A panic while holding the lock cannot leave an entry half-written, so
    // a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
