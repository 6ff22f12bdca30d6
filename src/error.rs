//! Error types for the Sequence game client.

use std::fmt;

use thiserror::Error;

/// The remote operation a failure belongs to.
///
/// Each operation has a fixed, user-facing banner message so the view never
/// has to surface raw transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `POST /game`
    CreateGame,
    /// `POST /game/join/{gameUuid}`
    JoinGame,
    /// `GET /game/{gameUuid}` or `GET /game/{gameUuid}/{playerUuid}`
    FetchGame,
    /// `POST /game/{gameUuid}/start/{hostUuid}`
    StartGame,
    /// `POST /game/{gameUuid}/move/{playerUuid}`
    SubmitMove,
}

impl Operation {
    /// Banner shown when the server rejects the request or the transport fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::CreateGame => "Unable to create game.",
            Self::JoinGame => "Unable to join game.",
            Self::FetchGame => "Unable to load game details.",
            Self::StartGame => "Unable to start game.",
            Self::SubmitMove => "Unable to submit move.",
        }
    }

    /// Banner shown when a nominally successful response carries no usable body.
    pub fn empty_message(self) -> &'static str {
        match self {
            Self::CreateGame => "Create game response did not include a game UUID.",
            Self::JoinGame => "Join game response did not include a game UUID.",
            Self::FetchGame => "Game details response was empty.",
            Self::StartGame => "Start game response was empty.",
            Self::SubmitMove => "Move response was empty.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateGame => "create game",
            Self::JoinGame => "join game",
            Self::FetchGame => "fetch game",
            Self::StartGame => "start game",
            Self::SubmitMove => "submit move",
        };
        f.write_str(name)
    }
}

/// Errors that can occur when talking to the game service.
#[derive(Debug, Error)]
pub enum SequenceError {
    /// The request never produced a response (connection refused, DNS, TLS…).
    #[error("{operation} request failed: {message}")]
    Request {
        /// Operation that was attempted.
        operation: Operation,
        /// Transport-level description of the failure.
        message: String,
    },

    /// The server answered with a non-success status code.
    #[error("{operation} rejected with HTTP status {status}")]
    Status {
        /// Operation that was attempted.
        operation: Operation,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// The server answered successfully but the body was empty or lacked a
    /// required identifier.
    #[error("{operation} response was empty")]
    EmptyResponse {
        /// Operation that was attempted.
        operation: Operation,
    },

    /// The response body could not be decoded.
    #[error("{operation} response could not be decoded: {source}")]
    Decode {
        /// Operation that was attempted.
        operation: Operation,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The client configuration is unusable (e.g. an unparsable base URL).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An operation timed out.
    #[error("{0} timed out")]
    Timeout(Operation),

    /// An action was attempted that the current view does not permit.
    #[error("action not permitted: {0}")]
    NotPermitted(&'static str),
}

impl SequenceError {
    /// The operation this error belongs to, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Request { operation, .. }
            | Self::Status { operation, .. }
            | Self::EmptyResponse { operation }
            | Self::Decode { operation, .. } => Some(*operation),
            Self::Timeout(operation) => Some(*operation),
            Self::Config(_) | Self::NotPermitted(_) => None,
        }
    }

    /// Fixed, user-facing message for an alert banner.
    pub fn banner_message(&self) -> String {
        match self {
            Self::EmptyResponse { operation } => operation.empty_message().to_string(),
            Self::Request { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. } => operation.failure_message().to_string(),
            Self::Timeout(operation) => operation.failure_message().to_string(),
            Self::Config(_) => "Client is misconfigured.".to_string(),
            Self::NotPermitted(reason) => (*reason).to_string(),
        }
    }
}

/// A specialized [`Result`] type for Sequence client operations.
pub type Result<T> = std::result::Result<T, SequenceError>;
