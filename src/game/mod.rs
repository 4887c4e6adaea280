// Public API - what other modules can use
pub use handlers::{begin_game, end_game, get_game, play_game, recent_games};
pub use roster::{GameRoster, RosterEntry};
pub use service::GameService;

// Internal modules
pub mod errors;
mod handlers;
pub mod models;
pub mod repository;
mod roster;
pub mod service;
pub mod types;
