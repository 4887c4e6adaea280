use thiserror::Error;

use crate::player::errors::PlayerError;

/// Failures a caller can get back from the game state machine.
#[derive(Debug, Clone, Error)]
pub enum GameError {
    /// Bad input shape: wrong player count, unknown scorer, missing fields.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// The game is terminal and the requested transition is off the table.
    #[error("{0}")]
    GameOver(String),

    /// The stored game moved past the caller's snapshot.
    #[error("Save conflict: {0}")]
    Conflict(String),

    /// A statistics write against the player registry failed.
    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("Storage error: {0}")]
    Storage(String),
}
