//! Application routes and the paths that lead to them.
//!
//! ```text
//! /                                  Home
//! /lobby/:gameUuid                   Lobby, read-only viewer
//! /lobby/:gameUuid/:privatePlayerUuid  Lobby, seated player
//! ```
//!
//! Path identifiers may be canonical UUIDs or short tokens; parsing always
//! normalizes them to canonical form and building always emits short tokens.

use crate::cache::CacheKey;
use crate::protocol::{GameUuid, PlayerUuid};
use crate::short_id::{to_canonical_uuid, to_short_uuid};

const LOBBY: &str = "lobby";

/// A resolved application route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Lobby {
        game_uuid: GameUuid,
        /// `None` for a viewer.
        private_player_uuid: Option<PlayerUuid>,
    },
}

impl Route {
    /// Resolve a URL path. Query strings, fragments, empty segments and
    /// trailing slashes are ignored; `/lobby` without a game goes home.
    ///
    /// Returns `None` for paths outside the routing surface.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | [LOBBY] => Some(Self::Home),
            [LOBBY, game] => Some(Self::Lobby {
                game_uuid: to_canonical_uuid(game)?,
                private_player_uuid: None,
            }),
            [LOBBY, game, private] => Some(Self::Lobby {
                game_uuid: to_canonical_uuid(game)?,
                private_player_uuid: to_canonical_uuid(private),
            }),
            _ => {
                tracing::debug!(path, "no route for path");
                None
            }
        }
    }

    /// The path for this route, with short tokens.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Lobby {
                game_uuid,
                private_player_uuid,
            } => lobby_path(game_uuid, private_player_uuid.as_deref())
                .unwrap_or_else(|| "/".to_string()),
        }
    }

    /// The viewer link to share for a lobby route. Never carries the
    /// private identifier.
    pub fn invite_path(&self) -> Option<String> {
        match self {
            Self::Home => None,
            Self::Lobby { game_uuid, .. } => invite_path(game_uuid),
        }
    }

    pub fn game_uuid(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Lobby { game_uuid, .. } => Some(game_uuid),
        }
    }

    pub fn private_player_uuid(&self) -> Option<&str> {
        match self {
            Self::Home => None,
            Self::Lobby {
                private_player_uuid,
                ..
            } => private_player_uuid.as_deref(),
        }
    }

    /// Cache key of a lobby route.
    pub fn cache_key(&self) -> Option<CacheKey> {
        match self {
            Self::Home => None,
            Self::Lobby {
                game_uuid,
                private_player_uuid,
            } => Some(CacheKey::for_route(game_uuid, private_player_uuid.as_deref())),
        }
    }
}

/// `/lobby/:game[/:private]` with short tokens. `None` for a blank game.
pub fn lobby_path(game_uuid: &str, private_player_uuid: Option<&str>) -> Option<String> {
    let game = to_short_uuid(game_uuid)?;
    Some(match private_player_uuid.and_then(to_short_uuid) {
        Some(private) => format!("/{LOBBY}/{game}/{private}"),
        None => format!("/{LOBBY}/{game}"),
    })
}

/// `/lobby/:game` with a short token. `None` for a blank game.
pub fn invite_path(game_uuid: &str) -> Option<String> {
    lobby_path(game_uuid, None)
}
