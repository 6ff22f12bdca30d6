//! High-level client tying a [`GameApi`] to the shared snapshot cache.
//!
//! [`GameClient`] runs the user-initiated mutations (create, join, start,
//! move) and writes every successful game response straight through to the
//! cache, so the acting player sees their own move without waiting for the
//! next poll. [`GameClient::watch`] starts the refresh loop for a key.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> sequence_client::Result<()> {
//! use sequence_client::{ClientConfig, GameClient, HttpApi};
//!
//! let config = ClientConfig::from_env();
//! let client = GameClient::new(HttpApi::new(&config)?, config);
//!
//! let session = client.create_game(Some("Alice")).await?;
//! println!("share {}", session.route().invite_path().unwrap_or_default());
//!
//! let (mut poller, mut events) = client.watch(session.cache_key());
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! poller.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::GameApi;
use crate::cache::{CacheKey, GameCache, WriteOutcome};
use crate::config::ClientConfig;
use crate::error::{Operation, Result, SequenceError};
use crate::poller::{refresh, GamePoller, PollEvent};
use crate::protocol::{
    GameJoinedResponse, GameResponse, GameUuid, MoveAction, PlayerNameRequest, PlayerUuid,
};
use crate::route::Route;
use crate::short_id::to_canonical_uuid;

// ── GameSession ─────────────────────────────────────────────────────

/// Identifiers handed out when creating or joining a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub game_uuid: GameUuid,
    pub public_player_uuid: Option<PlayerUuid>,
    /// The capability to act as this player. Keep it out of shared links.
    pub private_player_uuid: Option<PlayerUuid>,
    pub player_name: Option<String>,
}

impl GameSession {
    fn from_response(operation: Operation, response: GameJoinedResponse) -> Result<Self> {
        let game_uuid = non_blank(response.game_uuid)
            .ok_or(SequenceError::EmptyResponse { operation })?;
        Ok(Self {
            game_uuid,
            public_player_uuid: non_blank(response.public_player_uuid),
            private_player_uuid: non_blank(response.private_player_uuid),
            player_name: response.player_name,
        })
    }

    /// The lobby route this session lands on.
    pub fn route(&self) -> Route {
        Route::Lobby {
            game_uuid: self.game_uuid.clone(),
            private_player_uuid: self.private_player_uuid.clone(),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_route(&self.game_uuid, self.private_player_uuid.as_deref())
    }
}

// ── Client handle ───────────────────────────────────────────────────

/// Mutations plus the shared cache, over any [`GameApi`].
///
/// Cloning shares the backend and the cache.
pub struct GameClient<A: GameApi> {
    api: Arc<A>,
    cache: Arc<GameCache>,
    config: ClientConfig,
}

impl<A: GameApi> GameClient<A> {
    /// Create a client with a fresh cache.
    pub fn new(api: A, config: ClientConfig) -> Self {
        Self::with_cache(Arc::new(api), Arc::new(GameCache::new()), config)
    }

    /// Create a client over an existing backend and cache.
    pub fn with_cache(api: Arc<A>, cache: Arc<GameCache>, config: ClientConfig) -> Self {
        Self { api, cache, config }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    pub fn cache(&self) -> &Arc<GameCache> {
        &self.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a game, seating the caller. A blank name is sent as no name.
    ///
    /// # Errors
    ///
    /// Fails with [`SequenceError::EmptyResponse`] if the response carries no
    /// game identifier, or with the backend's error.
    pub async fn create_game(&self, player_name: Option<&str>) -> Result<GameSession> {
        let operation = Operation::CreateGame;
        let response = self
            .api
            .create_game(PlayerNameRequest::from_name(player_name))
            .await?
            .ok_or(SequenceError::EmptyResponse { operation })?;
        let session = GameSession::from_response(operation, response)?;
        info!(game = %session.game_uuid, "game created");
        Ok(session)
    }

    /// Join an existing game. The identifier may be canonical or short.
    ///
    /// # Errors
    ///
    /// As [`create_game`](Self::create_game).
    pub async fn join_game(
        &self,
        game_uuid: &str,
        player_name: Option<&str>,
    ) -> Result<GameSession> {
        let operation = Operation::JoinGame;
        let game_uuid = require_id(game_uuid, "A game identifier is required.")?;
        let response = self
            .api
            .join_game(&game_uuid, PlayerNameRequest::from_name(player_name))
            .await?
            .ok_or(SequenceError::EmptyResponse { operation })?;
        let session = GameSession::from_response(operation, response)?;
        info!(game = %session.game_uuid, "game joined");
        Ok(session)
    }

    /// Fetch `key` once through the versioned cache and return whatever
    /// snapshot is current afterwards.
    ///
    /// A response that lost to a newer write is not an error: the newer
    /// snapshot is returned instead.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if it was the newest write for the key.
    pub async fn fetch(&self, key: &CacheKey) -> Result<Option<Arc<GameResponse>>> {
        let refreshed = refresh(self.api.as_ref(), &self.cache, key).await;
        match (refreshed.outcome, refreshed.error) {
            (WriteOutcome::Applied, Some(e)) => Err(e),
            (WriteOutcome::Stale, _) => {
                debug!(game = %key.game_uuid, stamp = refreshed.stamp, "fetch superseded");
                Ok(self.cache.snapshot(key))
            }
            (WriteOutcome::Applied, None) => Ok(self.cache.snapshot(key)),
        }
    }

    /// Start the game as its host and write the response through.
    ///
    /// # Errors
    ///
    /// Fails with [`SequenceError::EmptyResponse`] on an empty body, or with
    /// the backend's error. The cache is untouched on failure.
    pub async fn start_game(
        &self,
        game_uuid: &str,
        host_private_uuid: &str,
    ) -> Result<Arc<GameResponse>> {
        let game_uuid = require_id(game_uuid, "A game identifier is required.")?;
        let host = require_id(host_private_uuid, "Only the host can start the game.")?;
        let response = self
            .api
            .start_game(&game_uuid, &host)
            .await?
            .ok_or(SequenceError::EmptyResponse {
                operation: Operation::StartGame,
            })?;
        info!(game = %game_uuid, "game started");
        Ok(self.write_through(CacheKey::player(game_uuid, host), response))
    }

    /// Submit a move and write the response through.
    ///
    /// # Errors
    ///
    /// As [`start_game`](Self::start_game).
    pub async fn submit_move(
        &self,
        game_uuid: &str,
        player_private_uuid: &str,
        action: &MoveAction,
    ) -> Result<Arc<GameResponse>> {
        let game_uuid = require_id(game_uuid, "A game identifier is required.")?;
        let player = require_id(player_private_uuid, "Viewers cannot submit moves.")?;
        let response = self
            .api
            .submit_move(&game_uuid, &player, action)
            .await?
            .ok_or(SequenceError::EmptyResponse {
                operation: Operation::SubmitMove,
            })?;
        info!(game = %game_uuid, row = action.row, column = action.column, "move submitted");
        Ok(self.write_through(CacheKey::player(game_uuid, player), response))
    }

    /// Start refreshing `key` in the background.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use = "dropping the poller stops polling immediately"]
    pub fn watch(&self, key: CacheKey) -> (GamePoller, mpsc::Receiver<PollEvent>) {
        GamePoller::spawn(
            Arc::clone(&self.api),
            Arc::clone(&self.cache),
            key,
            &self.config,
        )
    }

    fn write_through(&self, key: CacheKey, response: GameResponse) -> Arc<GameResponse> {
        let snapshot = Arc::new(response);
        self.cache.write_through(&key, Arc::clone(&snapshot));
        snapshot
    }
}

impl<A: GameApi> Clone for GameClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

impl<A: GameApi> std::fmt::Debug for GameClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClient")
            .field("config", &self.config)
            .field("cached_keys", &self.cache.len())
            .finish()
    }
}

fn non_blank(id: Option<String>) -> Option<String> {
    id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())
}

/// Canonicalize a caller-supplied identifier, rejecting blanks.
fn require_id(id: &str, reason: &'static str) -> Result<String> {
    to_canonical_uuid(id).ok_or(SequenceError::NotPermitted(reason))
}
