//! Abstraction over the game service's REST operations.
//!
//! The [`GameApi`] trait covers the six operations the client consumes.
//! Connection details (base URL, credentials, timeouts) are deliberately not
//! part of the trait; construct a configured implementation externally and
//! hand it to [`GameClient::new`](crate::GameClient::new).
//!
//! # Implementing a Custom Backend
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use sequence_client::api::GameApi;
//! use sequence_client::error::Result;
//! use sequence_client::protocol::{
//!     GameJoinedResponse, GameResponse, MoveAction, PlayerNameRequest,
//! };
//!
//! struct InMemory;
//!
//! #[async_trait]
//! impl GameApi for InMemory {
//!     async fn create_game(&self, _: Option<PlayerNameRequest>) -> Result<Option<GameJoinedResponse>> {
//!         Ok(None)
//!     }
//!     async fn join_game(&self, _: &str, _: Option<PlayerNameRequest>) -> Result<Option<GameJoinedResponse>> {
//!         Ok(None)
//!     }
//!     async fn fetch_as_player(&self, _: &str, _: &str) -> Result<Option<GameResponse>> {
//!         Ok(None)
//!     }
//!     async fn fetch_as_viewer(&self, _: &str) -> Result<Option<GameResponse>> {
//!         Ok(None)
//!     }
//!     async fn start_game(&self, _: &str, _: &str) -> Result<Option<GameResponse>> {
//!         Ok(None)
//!     }
//!     async fn submit_move(&self, _: &str, _: &str, _: &MoveAction) -> Result<Option<GameResponse>> {
//!         Ok(None)
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::{GameJoinedResponse, GameResponse, MoveAction, PlayerNameRequest};

/// The REST operations of the game service.
///
/// All identifiers passed in are canonical UUIDs. Every method returns
/// `Ok(None)` when the server answered successfully with an empty body; the
/// caller decides whether that is a failure.
///
/// # Object Safety
///
/// This trait is object-safe, so `Arc<dyn GameApi>` works for dynamic
/// dispatch. [`GameClient`](crate::GameClient) is generic over the
/// implementation for the common case.
#[async_trait]
pub trait GameApi: Send + Sync + 'static {
    /// `POST /game`, with the body omitted when no name is given.
    ///
    /// # Errors
    ///
    /// Returns a [`SequenceError`](crate::SequenceError) tagged
    /// [`Operation::CreateGame`](crate::Operation::CreateGame) on failure.
    async fn create_game(
        &self,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>>;

    /// `POST /game/join/{gameUuid}`.
    ///
    /// # Errors
    ///
    /// Returns an error tagged [`Operation::JoinGame`](crate::Operation::JoinGame).
    async fn join_game(
        &self,
        game_uuid: &str,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>>;

    /// `GET /game/{gameUuid}/{playerUuid}`: the full snapshot including the
    /// player's hand.
    ///
    /// # Errors
    ///
    /// Returns an error tagged [`Operation::FetchGame`](crate::Operation::FetchGame).
    async fn fetch_as_player(
        &self,
        game_uuid: &str,
        player_uuid: &str,
    ) -> Result<Option<GameResponse>>;

    /// `GET /game/{gameUuid}`: the snapshot without any hand.
    ///
    /// # Errors
    ///
    /// Returns an error tagged [`Operation::FetchGame`](crate::Operation::FetchGame).
    async fn fetch_as_viewer(&self, game_uuid: &str) -> Result<Option<GameResponse>>;

    /// `POST /game/{gameUuid}/start/{hostUuid}`.
    ///
    /// # Errors
    ///
    /// Returns an error tagged [`Operation::StartGame`](crate::Operation::StartGame).
    async fn start_game(&self, game_uuid: &str, host_uuid: &str) -> Result<Option<GameResponse>>;

    /// `POST /game/{gameUuid}/move/{playerUuid}` with `{row, column, card}`.
    ///
    /// # Errors
    ///
    /// Returns an error tagged [`Operation::SubmitMove`](crate::Operation::SubmitMove).
    async fn submit_move(
        &self,
        game_uuid: &str,
        player_uuid: &str,
        action: &MoveAction,
    ) -> Result<Option<GameResponse>>;
}

#[async_trait]
impl<T: GameApi + ?Sized> GameApi for Arc<T> {
    async fn create_game(
        &self,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>> {
        (**self).create_game(request).await
    }

    async fn join_game(
        &self,
        game_uuid: &str,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>> {
        (**self).join_game(game_uuid, request).await
    }

    async fn fetch_as_player(
        &self,
        game_uuid: &str,
        player_uuid: &str,
    ) -> Result<Option<GameResponse>> {
        (**self).fetch_as_player(game_uuid, player_uuid).await
    }

    async fn fetch_as_viewer(&self, game_uuid: &str) -> Result<Option<GameResponse>> {
        (**self).fetch_as_viewer(game_uuid).await
    }

    async fn start_game(&self, game_uuid: &str, host_uuid: &str) -> Result<Option<GameResponse>> {
        (**self).start_game(game_uuid, host_uuid).await
    }

    async fn submit_move(
        &self,
        game_uuid: &str,
        player_uuid: &str,
        action: &MoveAction,
    ) -> Result<Option<GameResponse>> {
        (**self).submit_move(game_uuid, player_uuid, action).await
    }
}
