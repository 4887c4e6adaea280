use thiserror::Error;

/// Failures a caller can get back from the player registry.
///
/// Every variant carries the message shown to the person at the table;
/// the HTTP layer maps variants to status codes without rewording them.
#[derive(Debug, Clone, Error)]
pub enum PlayerError {
    #[error("{0}")]
    InvalidName(String),

    #[error("{0}")]
    DuplicateName(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}
