//! # Sequence Client
//!
//! Client-side view-state engine for the Sequence board game.
//!
//! The game service owns all game logic. This crate turns its snapshots into
//! what a lobby screen needs: which board spaces to highlight for the selected
//! card, whose turn it is and what the caller may do, a normalized move
//! history, and a polling cache that never lets a stale poll roll back the
//! caller's own move.
//!
//! ## Features
//!
//! - **Backend-agnostic**: implement the [`GameApi`] trait for any backend
//! - **HTTP built-in**: default `transport-http` feature provides [`HttpApi`]
//! - **Versioned cache**: polls and mutation write-throughs are ordered by stamp
//! - **Short links**: reversible 22-character tokens for lobby URLs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() -> sequence_client::Result<()> {
//! use sequence_client::{ClientConfig, GameClient, HttpApi, LobbySession, Route};
//!
//! let config = ClientConfig::from_env();
//! let client = GameClient::new(HttpApi::new(&config)?, config);
//!
//! let route = Route::parse("/lobby/mhvXdrZT4jP5T8vBxuvm75").unwrap_or(Route::Home);
//! if let Some(mut lobby) = LobbySession::open(client, &route) {
//!     let (mut poller, mut events) = lobby.watch();
//!     if events.recv().await.is_some() {
//!         let view = lobby.view();
//!         println!("{} ({})", view.status.label, view.game_code);
//!     }
//!     lobby.dismiss_completion();
//!     poller.shutdown().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod card;
pub mod client;
pub mod config;
pub mod error;
pub mod highlight;
pub mod history;
pub mod lobby;
pub mod poller;
pub mod protocol;
pub mod route;
pub mod short_id;
pub mod snapshot;
pub mod transports;
pub mod turn;

// Re-export primary types for ergonomic imports.
pub use api::GameApi;
pub use cache::{CacheEntry, CacheKey, FetchState, GameCache, ViewerKey, WriteOutcome};
pub use card::{Card, CardVariant, Suit};
pub use client::{GameClient, GameSession};
pub use config::ClientConfig;
pub use error::{Operation, Result, SequenceError};
pub use highlight::{BoardView, Highlight};
pub use lobby::{LobbySession, LobbyView};
pub use poller::{GamePoller, PollEvent};
pub use protocol::{BoardResponse, BoardSpace, GameResponse, GameStatus, MoveAction, TeamColour};
pub use route::Route;
pub use snapshot::PlayerIdentity;
pub use turn::TurnState;

#[cfg(feature = "transport-http")]
pub use transports::HttpApi;
