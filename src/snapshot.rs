//! Read-only predicates over a [`GameResponse`] from one caller's point of view.
//!
//! A caller may know up to two identifiers for themselves: the private one
//! from the route (a capability) and the public one the server echoes back
//! as `userPublicUuid`. Different views of the same game expose different
//! identifier sets, so every "is this me?" check accepts either.

use crate::card::Card;
use crate::protocol::{GameResponse, GameStatus, PlayerUuid, TeamColour};

/// Fallback shown when a player identifier has no name in the snapshot.
pub const UNKNOWN_PLAYER: &str = "Unknown player";

/// Placeholder for an unset host or turn.
pub const UNSET: &str = "-";

/// The identifiers a caller holds for themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Public identifier, as echoed by the server.
    pub public: Option<PlayerUuid>,
    /// Private identifier from the route. `None` for viewers.
    pub private: Option<PlayerUuid>,
}

impl PlayerIdentity {
    /// Identity of a read-only viewer.
    pub fn viewer() -> Self {
        Self::default()
    }

    /// Combine the route's private identifier with the snapshot's echo.
    pub fn resolve(private: Option<&str>, snapshot: Option<&GameResponse>) -> Self {
        Self {
            public: snapshot.and_then(|s| s.user_public_uuid.clone()),
            private: private.map(str::to_string),
        }
    }

    /// A viewer holds no private identifier.
    pub fn is_viewer(&self) -> bool {
        self.private.is_none()
    }

    /// `true` iff `value` is set and equals either identifier.
    pub fn matches(&self, value: Option<&str>) -> bool {
        matches_player(value, self.public.as_deref(), self.private.as_deref())
    }
}

/// `true` iff `value` is defined and equals `public` or `private`.
pub fn matches_player(value: Option<&str>, public: Option<&str>, private: Option<&str>) -> bool {
    match value {
        Some(value) => Some(value) == public || Some(value) == private,
        None => false,
    }
}

/// The caller's team. The private identifier's team wins over the public one.
pub fn player_colour(
    snapshot: &GameResponse,
    public: Option<&str>,
    private: Option<&str>,
) -> Option<TeamColour> {
    let team_of = |id: Option<&str>| id.and_then(|id| snapshot.player_teams.get(id)).copied();
    team_of(private).or_else(|| team_of(public))
}

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Waiting,
    Active,
    Finished,
    Muted,
}

/// Label and tone for a game status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub label: &'static str,
    pub tone: StatusTone,
}

/// Classify a status, with `None` meaning "still loading".
pub fn status_presentation(status: Option<GameStatus>) -> StatusPresentation {
    match status {
        Some(GameStatus::NotStarted) => StatusPresentation {
            label: "Waiting for players",
            tone: StatusTone::Waiting,
        },
        Some(GameStatus::InProgress) => StatusPresentation {
            label: "In progress",
            tone: StatusTone::Active,
        },
        Some(GameStatus::Completed) => StatusPresentation {
            label: "Completed",
            tone: StatusTone::Finished,
        },
        None => StatusPresentation {
            label: "Loading",
            tone: StatusTone::Muted,
        },
    }
}

/// A seated player as shown in the game info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub player_uuid: PlayerUuid,
    pub name: String,
    pub team: Option<TeamColour>,
    pub is_current_turn: bool,
}

impl GameResponse {
    /// Display name for a player, falling back to [`UNKNOWN_PLAYER`].
    pub fn player_name(&self, player: &str) -> &str {
        self.player_names
            .get(player)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PLAYER)
    }

    /// Host's name, or [`UNSET`].
    pub fn host_name(&self) -> &str {
        self.host
            .as_deref()
            .map_or(UNSET, |host| self.player_name(host))
    }

    /// Name of the player whose turn it is, or [`UNSET`].
    pub fn current_turn_name(&self) -> &str {
        self.current_player_turn
            .as_deref()
            .map_or(UNSET, |player| self.player_name(player))
    }

    /// Winner's name if known, else the raw identifier.
    pub fn winner_name(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        Some(self.player_names.get(winner).map_or(winner, String::as_str))
    }

    /// Players in seating order with their names and teams.
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.players
            .iter()
            .map(|player| RosterEntry {
                player_uuid: player.clone(),
                name: self.player_name(player).to_string(),
                team: self.player_teams.get(player).copied(),
                is_current_turn: self.current_player_turn.as_deref() == Some(player.as_str()),
            })
            .collect()
    }

    /// The hand to show. Viewers never see one, whatever the payload says.
    pub fn visible_hand(&self, identity: &PlayerIdentity) -> &[Card] {
        if identity.is_viewer() {
            return &[];
        }
        self.player_hand.as_deref().unwrap_or(&[])
    }
}
