//! HTTP backend using `reqwest`.
//!
//! [`HttpApi`] implements [`GameApi`] against the game service's REST
//! endpoints. Path identifiers are normalized to canonical form and escaped as
//! single path segments before use, so short tokens taken straight from a
//! route work too.
//!
//! # Feature gate
//!
//! This module is only available when the `transport-http` feature is enabled
//! (it is enabled by default).
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> sequence_client::Result<()> {
//! use sequence_client::{ClientConfig, GameApi, HttpApi};
//!
//! let api = HttpApi::new(&ClientConfig::from_env())?;
//! if let Some(game) = api.fetch_as_viewer("mhvXdrZT4jP5T8vBxuvm75").await? {
//!     println!("status: {:?}", game.status);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::GameApi;
use crate::config::ClientConfig;
use crate::error::{Operation, Result, SequenceError};
use crate::protocol::{GameJoinedResponse, GameResponse, MoveAction, PlayerNameRequest};
use crate::short_id::to_canonical_uuid;

/// A [`GameApi`] backed by `reqwest`.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    base: Url,
    bearer_token: Option<String>,
}

impl HttpApi {
    /// Build a client for `config.base_url()`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Config`] if the base URL does not parse or
    /// the HTTP client cannot be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url().to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| SequenceError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(SequenceError::Config(format!(
                "base URL {base_url:?} cannot carry a path"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SequenceError::Config(format!("http client init failed: {e}")))?;
        tracing::debug!(base_url = %base_url, "http api configured");
        Ok(Self {
            http,
            base_url,
            base,
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// The base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base_url` with each of `segments` appended as one escaped path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base URL can carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(segments));
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        builder: RequestBuilder,
    ) -> Result<Option<T>> {
        let response = builder.send().await.map_err(|e| classify(operation, &e))?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%operation, status = status.as_u16(), "request rejected");
            return Err(SequenceError::Status {
                operation,
                status: status.as_u16(),
            });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| classify(operation, &e))?;
        decode_body(operation, &body)
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: Operation,
        builder: RequestBuilder,
        body: Option<&B>,
    ) -> Result<Option<T>> {
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(operation, builder).await
    }
}

#[async_trait]
impl GameApi for HttpApi {
    async fn create_game(
        &self,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>> {
        let builder = self.request(Method::POST, &["game"]);
        self.send_json(Operation::CreateGame, builder, request.as_ref())
            .await
    }

    async fn join_game(
        &self,
        game_uuid: &str,
        request: Option<PlayerNameRequest>,
    ) -> Result<Option<GameJoinedResponse>> {
        let game = canonical(game_uuid);
        let builder = self.request(Method::POST, &["game", "join", &game]);
        self.send_json(Operation::JoinGame, builder, request.as_ref())
            .await
    }

    async fn fetch_as_player(
        &self,
        game_uuid: &str,
        player_uuid: &str,
    ) -> Result<Option<GameResponse>> {
        let game = canonical(game_uuid);
        let player = canonical(player_uuid);
        let builder = self.request(Method::GET, &["game", &game, &player]);
        self.send(Operation::FetchGame, builder).await
    }

    async fn fetch_as_viewer(&self, game_uuid: &str) -> Result<Option<GameResponse>> {
        let game = canonical(game_uuid);
        let builder = self.request(Method::GET, &["game", &game]);
        self.send(Operation::FetchGame, builder).await
    }

    async fn start_game(&self, game_uuid: &str, host_uuid: &str) -> Result<Option<GameResponse>> {
        let game = canonical(game_uuid);
        let host = canonical(host_uuid);
        let builder = self.request(Method::POST, &["game", &game, "start", &host]);
        self.send(Operation::StartGame, builder).await
    }

    async fn submit_move(
        &self,
        game_uuid: &str,
        player_uuid: &str,
        action: &MoveAction,
    ) -> Result<Option<GameResponse>> {
        let game = canonical(game_uuid);
        let player = canonical(player_uuid);
        let builder = self.request(Method::POST, &["game", &game, "move", &player]);
        self.send_json(Operation::SubmitMove, builder, Some(action))
            .await
    }
}

fn canonical(id: &str) -> String {
    to_canonical_uuid(id).unwrap_or_else(|| id.to_string())
}

fn classify(operation: Operation, error: &reqwest::Error) -> SequenceError {
    if error.is_timeout() {
        return SequenceError::Timeout(operation);
    }
    SequenceError::Request {
        operation,
        message: error.to_string(),
    }
}

/// An empty (or whitespace-only, or `null`) body is `Ok(None)`.
fn decode_body<T: DeserializeOwned>(operation: Operation, body: &[u8]) -> Result<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(body)
        .map_err(|source| SequenceError::Decode { operation, source })
}
