// Library crate for the foosball tracker
// This file exposes the public API for integration tests

pub mod game;
pub mod player;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use game::GameService;
pub use player::PlayerRegistry;
pub use shared::{AppError, AppState};

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Builds the application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(player::index))
        .route("/players", post(player::create_player).get(player::list_players))
        .route("/players/:id", get(player::get_player))
        .route("/players/:id/name", put(player::rename_player))
        .route("/games", post(game::begin_game))
        .route("/games/recent", get(game::recent_games))
        .route("/games/:id", get(game::get_game))
        .route("/games/:id/play", post(game::play_game))
        .route("/games/:id/end", post(game::end_game))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
