//! One lobby route's interactive state and the view composed from it.
//!
//! [`LobbySession`] holds what the server does not: the selected card, the
//! dismissed completion overlays and the last mutation errors. Everything
//! else is derived from the cached snapshot each time [`LobbySession::view`]
//! is called.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::GameApi;
use crate::cache::CacheKey;
use crate::card::{format_card_value, Card};
use crate::client::GameClient;
use crate::error::{Result, SequenceError};
use crate::highlight::{is_dead_card, BoardView, Highlight};
use crate::history::{normalize_history, HistoryItem};
use crate::poller::{GamePoller, PollEvent};
use crate::protocol::{BoardSpace, GameResponse, GameUuid, MoveAction, PlayerUuid};
use crate::route::{invite_path, Route};
use crate::short_id::{format_identifier, to_canonical_uuid};
use crate::snapshot::{status_presentation, PlayerIdentity, RosterEntry, StatusPresentation, UNSET};
use crate::turn::{CompletionTracker, TurnState};

/// Alert keys, in display order.
pub const LOBBY_ERROR: &str = "lobby-error";
pub const START_GAME_ERROR: &str = "start-game-error";
pub const MOVE_ERROR: &str = "move-error";

/// A banner to show above the lobby.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub key: &'static str,
    pub message: String,
}

/// One board cell ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyCell {
    pub row: u32,
    pub col: u32,
    /// `None` for a hole in sparse board data.
    pub space: Option<BoardSpace>,
    pub highlight: Highlight,
}

/// One card in the caller's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandCard {
    pub card: Card,
    pub selected: bool,
    /// `A`, `2`…`10`, `J`, `Q`, `K` or `-`.
    pub face: String,
    /// `Wild` or `Remove` for jacks.
    pub label: Option<&'static str>,
    /// A regular card with no open space left on the board.
    pub dead: bool,
}

/// Everything the lobby screen shows.
#[derive(Debug, Clone)]
pub struct LobbyView {
    pub status: StatusPresentation,
    pub turn: TurnState,
    pub turn_label: Option<&'static str>,
    /// Short game code for display.
    pub game_code: String,
    pub invite_path: Option<String>,
    pub host_name: String,
    pub current_turn_name: String,
    pub winner_name: Option<String>,
    pub rows: u32,
    pub cols: u32,
    /// Row-major, `rows * cols` long.
    pub cells: Vec<LobbyCell>,
    pub hand: Vec<HandCard>,
    pub history: Vec<HistoryItem>,
    pub roster: Vec<RosterEntry>,
    pub show_completion: bool,
    pub alerts: Vec<Alert>,
    /// No snapshot has arrived yet.
    pub is_loading: bool,
}

impl LobbyView {
    /// The cell at `(row, col)`, if inside the grid.
    pub fn cell(&self, row: u32, col: u32) -> Option<&LobbyCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let index = usize::try_from(u64::from(row) * u64::from(self.cols) + u64::from(col)).ok()?;
        self.cells.get(index)
    }

    /// Coordinates of highlighted cells in row-major order.
    pub fn highlighted(&self) -> Vec<(u32, u32)> {
        self.cells
            .iter()
            .filter(|cell| cell.highlight.is_highlighted())
            .map(|cell| (cell.row, cell.col))
            .collect()
    }
}

/// Interactive state for one lobby route.
pub struct LobbySession<A: GameApi> {
    client: GameClient<A>,
    game_uuid: GameUuid,
    private_player_uuid: Option<PlayerUuid>,
    key: CacheKey,
    selected: Option<Card>,
    completion: CompletionTracker,
    start_error: Option<String>,
    move_error: Option<String>,
}

impl<A: GameApi> LobbySession<A> {
    /// Session for a lobby route; `None` for [`Route::Home`].
    pub fn open(client: GameClient<A>, route: &Route) -> Option<Self> {
        match route {
            Route::Home => None,
            Route::Lobby {
                game_uuid,
                private_player_uuid,
            } => Some(Self::new(
                client,
                game_uuid.clone(),
                private_player_uuid.clone(),
            )),
        }
    }

    /// Session for `game_uuid`, seated as `private_player_uuid` if given.
    ///
    /// Both identifiers may be short tokens; they are canonicalized so the
    /// session reads the same cache entry that mutations write through to.
    pub fn new(
        client: GameClient<A>,
        game_uuid: GameUuid,
        private_player_uuid: Option<PlayerUuid>,
    ) -> Self {
        let game_uuid = to_canonical_uuid(&game_uuid).unwrap_or(game_uuid);
        let private_player_uuid = private_player_uuid.as_deref().and_then(to_canonical_uuid);
        let key = CacheKey::for_route(&game_uuid, private_player_uuid.as_deref());
        Self {
            client,
            game_uuid,
            private_player_uuid,
            key,
            selected: None,
            completion: CompletionTracker::new(),
            start_error: None,
            move_error: None,
        }
    }

    pub fn client(&self) -> &GameClient<A> {
        &self.client
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn route(&self) -> Route {
        Route::Lobby {
            game_uuid: self.game_uuid.clone(),
            private_player_uuid: self.private_player_uuid.clone(),
        }
    }

    /// The newest cached snapshot for this route.
    pub fn snapshot(&self) -> Option<Arc<GameResponse>> {
        self.client.cache().snapshot(&self.key)
    }

    pub fn identity(&self) -> PlayerIdentity {
        let snapshot = self.snapshot();
        PlayerIdentity::resolve(self.private_player_uuid.as_deref(), snapshot.as_deref())
    }

    pub fn turn_state(&self) -> TurnState {
        let snapshot = self.snapshot();
        let identity =
            PlayerIdentity::resolve(self.private_player_uuid.as_deref(), snapshot.as_deref());
        TurnState::classify(snapshot.as_deref(), &identity)
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.selected.as_ref()
    }

    /// Start refreshing this route's snapshot.
    #[must_use = "dropping the poller stops polling immediately"]
    pub fn watch(&self) -> (GamePoller, mpsc::Receiver<PollEvent>) {
        self.client.watch(self.key.clone())
    }

    /// Fetch once, outside the polling cadence.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if it was the newest write for this route.
    pub async fn refresh(&self) -> Result<Option<Arc<GameResponse>>> {
        self.client.fetch(&self.key).await
    }

    /// Toggle `card` as the selection. Returns whether a card is now selected.
    ///
    /// Ignored unless the caller may move.
    pub fn select_card(&mut self, card: &Card) -> bool {
        if !self.turn_state().can_submit_moves {
            debug!("card selection ignored, not the caller's move");
            return self.selected.is_some();
        }
        if self.selected.as_ref() == Some(card) {
            self.selected = None;
        } else {
            self.selected = Some(card.clone());
        }
        self.selected.is_some()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Play at `(row, col)` with the selected card, or else the card printed
    /// on the space.
    ///
    /// Returns `Ok(None)` without contacting the server when the caller may
    /// not move or the cell holds no space. On success the selection is
    /// cleared and the response is already in the cache.
    ///
    /// # Errors
    ///
    /// Returns the submission error, which is also kept for the move alert.
    pub async fn click_space(&mut self, row: u32, col: u32) -> Result<Option<Arc<GameResponse>>> {
        let Some(player) = self.private_player_uuid.clone() else {
            return Ok(None);
        };
        let Some(snapshot) = self.snapshot() else {
            return Ok(None);
        };
        let identity = PlayerIdentity::resolve(Some(player.as_str()), Some(snapshot.as_ref()));
        if !TurnState::classify(Some(snapshot.as_ref()), &identity).can_submit_moves {
            debug!(row, col, "board click ignored, not the caller's move");
            return Ok(None);
        }
        let board = BoardView::new(&snapshot.board);
        let Some(space) = board.cell(row, col) else {
            debug!(row, col, "board click outside any space");
            return Ok(None);
        };
        let action = MoveAction {
            row,
            column: col,
            card: self.selected.clone().or_else(|| space.card.clone()),
        };

        self.move_error = None;
        match self
            .client
            .submit_move(&self.game_uuid, &player, &action)
            .await
        {
            Ok(updated) => {
                self.selected = None;
                Ok(Some(updated))
            }
            Err(e) => {
                self.move_error = Some(e.banner_message());
                Err(e)
            }
        }
    }

    /// Start the game as its host.
    ///
    /// # Errors
    ///
    /// [`SequenceError::NotPermitted`] unless the caller is the host of a game
    /// not yet running; otherwise the server error, also kept for the
    /// start-game alert.
    pub async fn start_game(&mut self) -> Result<Arc<GameResponse>> {
        let Some(host) = self.private_player_uuid.clone() else {
            return Err(SequenceError::NotPermitted("Only the host can start the game."));
        };
        if !self.turn_state().can_start_game {
            return Err(SequenceError::NotPermitted("Only the host can start the game."));
        }
        self.start_error = None;
        match self.client.start_game(&self.game_uuid, &host).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                self.start_error = Some(e.banner_message());
                Err(e)
            }
        }
    }

    /// Hide the completion overlay for this game for good.
    pub fn dismiss_completion(&mut self) {
        self.completion.dismiss(&self.game_uuid);
    }

    /// Compose the lobby view from the newest snapshot.
    pub fn view(&self) -> LobbyView {
        let entry = self.client.cache().entry(&self.key);
        let snapshot = entry.as_ref().and_then(|entry| entry.snapshot.clone());
        let identity =
            PlayerIdentity::resolve(self.private_player_uuid.as_deref(), snapshot.as_deref());
        let turn = TurnState::classify(snapshot.as_deref(), &identity);

        let mut alerts = Vec::new();
        if let Some(message) = entry.as_ref().and_then(|entry| entry.last_error.clone()) {
            alerts.push(Alert {
                key: LOBBY_ERROR,
                message,
            });
        }
        if let Some(message) = &self.start_error {
            alerts.push(Alert {
                key: START_GAME_ERROR,
                message: message.clone(),
            });
        }
        if let Some(message) = &self.move_error {
            alerts.push(Alert {
                key: MOVE_ERROR,
                message: message.clone(),
            });
        }

        let mut view = LobbyView {
            status: status_presentation(snapshot.as_ref().and_then(|s| s.status)),
            turn,
            turn_label: turn.turn_label(),
            game_code: format_identifier(Some(&self.game_uuid)),
            invite_path: invite_path(&self.game_uuid),
            host_name: UNSET.to_string(),
            current_turn_name: UNSET.to_string(),
            winner_name: None,
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            hand: Vec::new(),
            history: Vec::new(),
            roster: Vec::new(),
            show_completion: false,
            alerts,
            is_loading: snapshot.is_none(),
        };
        let Some(snapshot) = snapshot else {
            return view;
        };

        let board = BoardView::new(&snapshot.board);
        // A leftover selection must not highlight once the turn has passed.
        let selected = self.selected.as_ref().filter(|_| turn.can_submit_moves);
        view.rows = board.rows();
        view.cols = board.cols();
        view.cells = board
            .decorate(selected, turn.player_colour)
            .into_iter()
            .map(|cell| LobbyCell {
                row: cell.row,
                col: cell.col,
                space: cell.space.cloned(),
                highlight: cell.highlight,
            })
            .collect();
        view.hand = snapshot
            .visible_hand(&identity)
            .iter()
            .map(|card| HandCard {
                card: card.clone(),
                selected: self.selected.as_ref() == Some(card),
                face: format_card_value(card.value),
                label: card.variant().special_label(),
                dead: is_dead_card(card, &snapshot.board),
            })
            .collect();
        view.history = normalize_history(&snapshot.move_history);
        view.roster = snapshot.roster();
        view.host_name = snapshot.host_name().to_string();
        view.current_turn_name = snapshot.current_turn_name().to_string();
        view.winner_name = snapshot.winner_name().map(str::to_string);
        view.show_completion = self.completion.should_show(&self.game_uuid, snapshot.status);
        view
    }
}

impl<A: GameApi> std::fmt::Debug for LobbySession<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LobbySession")
            .field("game_uuid", &self.game_uuid)
            .field("is_viewer", &self.private_player_uuid.is_none())
            .field("selected", &self.selected)
            .finish()
    }
}
