//! Wire-compatible types for the Sequence game service REST API.
//!
//! Every type here matches the JSON the service emits. Key adaptations:
//!
//! - Identifiers stay `String`s: route parameters may be pass-through values
//!   from the identifier codec, and comparisons are textual.
//! - Every collection defaults to empty and every identifier is optional, so
//!   sparse snapshots (viewer payloads, pre-start lobbies) still decode.
//!   An explicit `null` is read the same as a missing field.
//! - Move history stays as raw JSON; see [`crate::history`] for why.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::card::Card;

// ── Type aliases ────────────────────────────────────────────────────

/// Textual game identifier (canonical UUID on the wire).
pub type GameUuid = String;

/// Textual player identifier, public or private.
pub type PlayerUuid = String;

// ── Enums ───────────────────────────────────────────────────────────

/// Lifecycle of a game as declared by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Lobby open, waiting for the host to start.
    NotStarted,
    /// Moves are being accepted.
    InProgress,
    /// A team has won.
    Completed,
}

/// Team chip colour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamColour {
    Red,
    Blue,
    Green,
}

impl TeamColour {
    /// Upper-case wire name, used in "Team RED" style labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
        }
    }
}

/// Deserialize `null` as `T::default()`.
///
/// `#[serde(default)]` alone only covers a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Structs ─────────────────────────────────────────────────────────

/// One cell of the board.
///
/// `row` and `col` are required for the space to render; spaces missing
/// either are dropped by [`crate::highlight::BoardView`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSpace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
    /// Card printed on the cell; `None` for free corners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    /// Chip placed on the cell, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<TeamColour>,
    /// Chip is locked into a completed sequence.
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_of_sequence: bool,
}

impl BoardSpace {
    /// An empty space at `(row, col)` printed with `card`.
    pub fn new(row: u32, col: u32, card: Option<Card>) -> Self {
        Self {
            row: Some(row),
            col: Some(col),
            card,
            ..Self::default()
        }
    }

    /// Place a chip on this space.
    #[must_use]
    pub fn with_chip(mut self, colour: TeamColour) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Mark this space's chip as locked in a sequence.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.part_of_sequence = true;
        self
    }

    /// `(row, col)` if both are present.
    pub fn position(&self) -> Option<(u32, u32)> {
        Some((self.row?, self.col?))
    }

    /// `true` if no chip is placed here.
    pub fn is_empty(&self) -> bool {
        self.colour.is_none()
    }
}

/// The board as an unordered bag of spaces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub spaces: Vec<BoardSpace>,
}

/// A complete game snapshot. Replaced wholesale on every fetch or mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<GameUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_player_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_count: Option<u32>,
    /// `None` while nothing has been loaded, or if the server omitted it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub board: BoardResponse,
    /// Public player identifiers in seating order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<PlayerUuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_names: HashMap<PlayerUuid, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub player_teams: HashMap<PlayerUuid, TeamColour>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<PlayerUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_player_turn: Option<PlayerUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerUuid>,
    /// Only present in responses addressed to the hand's owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_hand: Option<Vec<Card>>,
    /// Raw entries in either of the two wire shapes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub move_history: Vec<serde_json::Value>,
    /// Public identifier of the caller when fetched with a private identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_public_uuid: Option<PlayerUuid>,
}

/// A move submitted by (or recorded for) a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAction {
    pub row: u32,
    pub column: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

/// Optional body for create and join requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerNameRequest {
    pub player_name: String,
}

impl PlayerNameRequest {
    /// Trim `name`; a blank name produces no body at all.
    pub fn from_name(name: Option<&str>) -> Option<Self> {
        let trimmed = name.map(str::trim).filter(|name| !name.is_empty())?;
        Some(Self {
            player_name: trimmed.to_string(),
        })
    }
}

/// Response to create and join.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameJoinedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_uuid: Option<GameUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_player_uuid: Option<PlayerUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_player_uuid: Option<PlayerUuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}
