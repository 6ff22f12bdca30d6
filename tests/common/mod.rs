#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for Sequence client integration tests.
//!
//! Provides a scripted [`MockApi`] and fixture snapshots for a small board
//! with two seated players.

use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use sequence_client::card::{Card, Suit};
use sequence_client::protocol::{
    BoardResponse, BoardSpace, GameJoinedResponse, GameResponse, GameStatus, MoveAction,
    PlayerNameRequest, TeamColour,
};
use sequence_client::{ClientConfig, GameApi, GameClient, Operation, Result, SequenceError};

// ── Identifiers ─────────────────────────────────────────────────────

pub const GAME: &str = "8f14e45f-ceea-467f-a0e6-3b4ea4b2e1d9";
pub const HOST_PRIVATE: &str = "0b9a3a64-7f1c-4d5e-9a2b-3c4d5e6f7a8b";
pub const HOST_PUBLIC: &str = "1c2d3e4f-5a6b-4c7d-8e9f-0a1b2c3d4e5f";
pub const GUEST_PRIVATE: &str = "2d3e4f5a-6b7c-4d8e-9f0a-1b2c3d4e5f60";
pub const GUEST_PUBLIC: &str = "3e4f5a6b-7c8d-4e9f-a0b1-c2d3e4f5a6b7";

// ── MockApi ─────────────────────────────────────────────────────────

/// One scripted answer, returned after `delay`.
pub struct Scripted<T> {
    pub delay: Duration,
    pub result: Result<Option<T>>,
}

/// A request the client made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateGame {
        name: Option<String>,
    },
    JoinGame {
        game: String,
        name: Option<String>,
    },
    FetchAsPlayer {
        game: String,
        player: String,
    },
    FetchAsViewer {
        game: String,
    },
    StartGame {
        game: String,
        host: String,
    },
    SubmitMove {
        game: String,
        player: String,
        action: MoveAction,
    },
}

/// A [`GameApi`] answering from per-operation scripts.
///
/// Both fetch flavours share one script. Once a script is exhausted the
/// operation never completes, which keeps a poll loop parked until
/// shutdown.
#[derive(Default)]
pub struct MockApi {
    create: StdMutex<VecDeque<Scripted<GameJoinedResponse>>>,
    join: StdMutex<VecDeque<Scripted<GameJoinedResponse>>>,
    fetch: StdMutex<VecDeque<Scripted<GameResponse>>>,
    start: StdMutex<VecDeque<Scripted<GameResponse>>>,
    moves: StdMutex<VecDeque<Scripted<GameResponse>>>,
    calls: StdMutex<Vec<Call>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_create(self, result: Result<Option<GameJoinedResponse>>) -> Self {
        push(&self.create, Duration::ZERO, result);
        self
    }

    pub fn on_join(self, result: Result<Option<GameJoinedResponse>>) -> Self {
        push(&self.join, Duration::ZERO, result);
        self
    }

    pub fn on_fetch(self, result: Result<Option<GameResponse>>) -> Self {
        self.on_fetch_after(Duration::ZERO, result)
    }

    pub fn on_fetch_after(self, delay: Duration, result: Result<Option<GameResponse>>) -> Self {
        push(&self.fetch, delay, result);
        self
    }

    pub fn on_start(self, result: Result<Option<GameResponse>>) -> Self {
        push(&self.start, Duration::ZERO, result);
        self
    }

    pub fn on_move(self, result: Result<Option<GameResponse>>) -> Self {
        push(&self.moves, Duration::ZERO, result);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::FetchAsPlayer { .. } | Call::FetchAsViewer { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn push<T>(queue: &StdMutex<VecDeque<Scripted<T>>>, delay: Duration, result: Result<Option<T>>) {
    queue
        .lock()
        .unwrap()
        .push_back(Scripted { delay, result });
}

async fn play<T>(queue: &StdMutex<VecDeque<Scripted<T>>>) -> Result<Option<T>> {
    let next = queue.lock().unwrap().pop_front();
    let Some(scripted) = next else {
        // Script exhausted: hang so the caller stays parked.
        return std::future::pending().await;
    };
    if !scripted.delay.is_zero() {
        tokio::time::sleep(scripted.delay).await;
    }
    scripted.result
}

#[async_trait]
impl GameApi for MockApi {
    async fn create_game(
        &self,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>> {
        self.record(Call::CreateGame {
            name: request.map(|r| r.player_name),
        });
        play(&self.create).await
    }

    async fn join_game(
        &self,
        game_uuid: &str,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>> {
        self.record(Call::JoinGame {
            game: game_uuid.to_string(),
            name: request.map(|r| r.player_name),
        });
        play(&self.join).await
    }

    async fn fetch_as_player(
        &self,
        game_uuid: &str,
        private_player_uuid: &str,
    ) -> Result<Option<GameResponse>> {
        self.record(Call::FetchAsPlayer {
            game: game_uuid.to_string(),
            player: private_player_uuid.to_string(),
        });
        play(&self.fetch).await
    }

    async fn fetch_as_viewer(&self, game_uuid: &str) -> Result<Option<GameResponse>> {
        self.record(Call::FetchAsViewer {
            game: game_uuid.to_string(),
        });
        play(&self.fetch).await
    }

    async fn start_game(
        &self,
        game_uuid: &str,
        host_private_uuid: &str,
    ) -> Result<Option<GameResponse>> {
        self.record(Call::StartGame {
            game: game_uuid.to_string(),
            host: host_private_uuid.to_string(),
        });
        play(&self.start).await
    }

    async fn submit_move(
        &self,
        game_uuid: &str,
        private_player_uuid: &str,
        action: &MoveAction,
    ) -> Result<Option<GameResponse>> {
        self.record(Call::SubmitMove {
            game: game_uuid.to_string(),
            player: private_player_uuid.to_string(),
            action: action.clone(),
        });
        play(&self.moves).await
    }
}

// ── Client helpers ──────────────────────────────────────────────────

pub fn test_config() -> ClientConfig {
    ClientConfig::new()
        .with_api_url("http://sequence.test/api")
        .with_poll_interval(Duration::from_secs(1))
        .with_shutdown_timeout(Duration::from_millis(200))
}

pub fn client(api: MockApi) -> GameClient<MockApi> {
    GameClient::new(api, test_config())
}

pub fn server_error(operation: Operation) -> SequenceError {
    SequenceError::Status {
        operation,
        status: 500,
    }
}

pub fn joined(private: &str, public: &str, name: &str) -> GameJoinedResponse {
    GameJoinedResponse {
        game_uuid: Some(GAME.into()),
        public_player_uuid: Some(public.into()),
        private_player_uuid: Some(private.into()),
        player_name: Some(name.into()),
    }
}

// ── Fixture snapshots ───────────────────────────────────────────────

pub fn five_of_hearts() -> Card {
    Card::new(Suit::Hearts, 5)
}

pub fn seven_of_spades() -> Card {
    Card::new(Suit::Spades, 7)
}

/// The host's hand: a playable card, a dead card and both jacks.
pub fn host_hand() -> Vec<Card> {
    vec![
        five_of_hearts(),
        seven_of_spades(),
        Card::two_eyed_jack(Suit::Diamonds),
        Card::one_eyed_jack(Suit::Spades),
    ]
}

/// A 2x3 board, host on RED and guest on BLUE:
///
/// ```text
///        col 0        col 1          col 2
/// row 0  free         5H             7S  BLUE
/// row 1  5H           QD BLUE (seq)  7S  RED
/// ```
pub fn board() -> BoardResponse {
    BoardResponse {
        spaces: vec![
            BoardSpace::new(0, 0, None),
            BoardSpace::new(0, 1, Some(five_of_hearts())),
            BoardSpace::new(0, 2, Some(seven_of_spades())).with_chip(TeamColour::Blue),
            BoardSpace::new(1, 0, Some(five_of_hearts())),
            BoardSpace::new(1, 1, Some(Card::new(Suit::Diamonds, 12)))
                .with_chip(TeamColour::Blue)
                .locked(),
            BoardSpace::new(1, 2, Some(seven_of_spades())).with_chip(TeamColour::Red),
        ],
    }
}

/// A lobby waiting for the host to start, as the host sees it.
pub fn lobby_game() -> GameResponse {
    GameResponse {
        uuid: Some(GAME.into()),
        max_player_size: Some(4),
        player_count: Some(2),
        status: Some(GameStatus::NotStarted),
        board: board(),
        players: vec![HOST_PUBLIC.into(), GUEST_PUBLIC.into()],
        player_names: [
            (HOST_PUBLIC.to_string(), "Alice".to_string()),
            (GUEST_PUBLIC.to_string(), "Bob".to_string()),
        ]
        .into(),
        player_teams: [
            (HOST_PUBLIC.to_string(), TeamColour::Red),
            (GUEST_PUBLIC.to_string(), TeamColour::Blue),
        ]
        .into(),
        host: Some(HOST_PUBLIC.into()),
        player_hand: Some(host_hand()),
        user_public_uuid: Some(HOST_PUBLIC.into()),
        ..GameResponse::default()
    }
}

/// A running game on the host's turn, as the host sees it. The history
/// holds one entry in each wire shape.
pub fn running_game() -> GameResponse {
    GameResponse {
        status: Some(GameStatus::InProgress),
        current_player_turn: Some(HOST_PUBLIC.into()),
        move_history: vec![
            json!({"left": HOST_PUBLIC, "right": {"row": 1, "column": 2, "card": {"suit": "SPADES", "value": 7}}}),
            json!({GUEST_PUBLIC: {"row": 0, "column": 2, "card": {"suit": "SPADES", "value": 7}}}),
        ],
        ..lobby_game()
    }
}

/// The running game won by the host.
pub fn completed_game() -> GameResponse {
    GameResponse {
        status: Some(GameStatus::Completed),
        current_player_turn: None,
        winner: Some(HOST_PUBLIC.into()),
        ..running_game()
    }
}

/// `game` as the guest sees it.
pub fn as_guest(game: GameResponse) -> GameResponse {
    GameResponse {
        user_public_uuid: Some(GUEST_PUBLIC.into()),
        player_hand: Some(vec![Card::new(Suit::Diamonds, 12)]),
        ..game
    }
}

/// `game` as a viewer sees it: no hand and no caller identity.
pub fn as_viewer(game: GameResponse) -> GameResponse {
    GameResponse {
        user_public_uuid: None,
        player_hand: None,
        ..game
    }
}
