use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::game::errors::GameError;
use crate::game::repository::{GameRepository, InMemoryGameRepository};
use crate::player::errors::PlayerError;
use crate::player::repository::{InMemoryPlayerRepository, PlayerRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository>,
    pub game_repository: Arc<dyn GameRepository>,
}

impl AppState {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository>,
        game_repository: Arc<dyn GameRepository>,
    ) -> Self {
        Self {
            player_repository,
            game_repository,
        }
    }

    /// State backed by in-memory stores, for development and tests.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryPlayerRepository::new()),
            Arc::new(InMemoryGameRepository::new()),
        )
    }
}

/// HTTP-facing failure. Core errors convert into this at the handler
/// boundary; the message is the one the core produced.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<PlayerError> for AppError {
    fn from(error: PlayerError) -> Self {
        match error {
            PlayerError::InvalidName(msg) => AppError::Validation(msg),
            PlayerError::DuplicateName(msg) => AppError::Duplicate(msg),
            PlayerError::NotFound(msg) => AppError::NotFound(msg),
            PlayerError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl From<GameError> for AppError {
    fn from(error: GameError) -> Self {
        match error {
            GameError::Validation(msg) => AppError::Validation(msg),
            GameError::NotFound(msg) => AppError::NotFound(msg),
            GameError::GameOver(msg) => AppError::Conflict(msg),
            GameError::Conflict(msg) => AppError::Conflict(msg),
            GameError::Player(inner) => inner.into(),
            GameError::Storage(msg) => AppError::Storage(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Duplicate(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Storage(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Storage error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
