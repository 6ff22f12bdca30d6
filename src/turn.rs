//! Whose turn it is and what the caller may do about it.

use std::collections::HashSet;

use crate::protocol::{GameResponse, GameStatus, TeamColour};
use crate::snapshot::{player_colour, PlayerIdentity};

/// Derived turn and role facts for one caller and one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnState {
    pub is_viewer: bool,
    pub is_host: bool,
    pub is_in_progress: bool,
    pub is_players_turn: bool,
    /// Only the host, identified by private capability, before the game runs.
    pub can_start_game: bool,
    /// Only a player holding a private identifier, on their turn, mid-game.
    pub can_submit_moves: bool,
    pub is_game_completed: bool,
    pub player_colour: Option<TeamColour>,
}

impl TurnState {
    /// Classify `snapshot` for `identity`. A missing snapshot grants nothing.
    pub fn classify(snapshot: Option<&GameResponse>, identity: &PlayerIdentity) -> Self {
        let is_viewer = identity.is_viewer();
        let Some(snapshot) = snapshot else {
            return Self {
                is_viewer,
                ..Self::default()
            };
        };

        let holds_capability = identity.private.is_some();
        let is_host = identity.matches(snapshot.host.as_deref());
        let is_in_progress = snapshot.status == Some(GameStatus::InProgress);
        let is_players_turn = identity.matches(snapshot.current_player_turn.as_deref());

        Self {
            is_viewer,
            is_host,
            is_in_progress,
            is_players_turn,
            can_start_game: holds_capability && is_host && !is_in_progress,
            can_submit_moves: holds_capability && is_players_turn && is_in_progress,
            is_game_completed: snapshot.status == Some(GameStatus::Completed),
            player_colour: player_colour(
                snapshot,
                identity.public.as_deref(),
                identity.private.as_deref(),
            ),
        }
    }

    /// Badge text for a seated player; viewers get none.
    pub fn turn_label(&self) -> Option<&'static str> {
        if self.is_viewer {
            return None;
        }
        Some(match (self.is_in_progress, self.is_players_turn) {
            (true, true) => "Your turn",
            (true, false) => "Waiting for turn",
            (false, _) => "Waiting for game start",
        })
    }
}

/// Remembers which games' completion overlay the user dismissed.
///
/// Keyed by game identifier: dismissing one game never hides another's.
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    dismissed: HashSet<String>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the overlay for a completed game not yet dismissed.
    pub fn should_show(&self, game_uuid: &str, status: Option<GameStatus>) -> bool {
        status == Some(GameStatus::Completed) && !self.dismissed.contains(game_uuid)
    }

    pub fn dismiss(&mut self, game_uuid: &str) {
        self.dismissed.insert(game_uuid.to_string());
    }

    pub fn is_dismissed(&self, game_uuid: &str) -> bool {
        self.dismissed.contains(game_uuid)
    }
}
