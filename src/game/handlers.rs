use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::{GameService, RECENT_GAMES_DEFAULT};
use super::types::{BeginGameRequest, GameDetailResponse, GameResponse, PlayRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for starting a game
///
/// POST /games
/// Expects exactly two registered player ids
#[instrument(name = "begin_game", skip(state))]
pub async fn begin_game(
    State(state): State<AppState>,
    Json(request): Json<BeginGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let service = GameService::new(
        Arc::clone(&state.game_repository),
        Arc::clone(&state.player_repository),
    );
    let game = service.begin(&request.players).await?;

    info!(game_id = %game.id, "Game started");

    Ok(Json(game.into()))
}

/// HTTP handler for a single game
///
/// GET /games/{id}
/// Returns the game with both seats resolved, winner first once decided
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetailResponse>, AppError> {
    let service = GameService::new(
        Arc::clone(&state.game_repository),
        Arc::clone(&state.player_repository),
    );
    let roster = service.roster(&game_id).await?;

    Ok(Json(roster.into()))
}

/// HTTP handler for recording a goal
///
/// POST /games/{id}/play
/// Accepts the sentinel scorer "nobody" as a recorded non-event
#[instrument(name = "play_game", skip(state))]
pub async fn play_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<PlayRequest>,
) -> Result<Json<GameResponse>, AppError> {
    let service = GameService::new(
        Arc::clone(&state.game_repository),
        Arc::clone(&state.player_repository),
    );
    let game = service.play(&game_id, request.scorer.as_deref()).await?;

    if game.is_over() {
        info!(game_id = %game.id, winner = ?game.winner, "Game finished");
    }

    Ok(Json(game.into()))
}

/// HTTP handler for ending a game prematurely
///
/// POST /games/{id}/end
#[instrument(name = "end_game", skip(state))]
pub async fn end_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    let service = GameService::new(
        Arc::clone(&state.game_repository),
        Arc::clone(&state.player_repository),
    );
    let game = service.abort(&game_id).await?;

    info!(game_id = %game.id, "Game abandoned");

    Ok(Json(game.into()))
}

/// HTTP handler for listing recent games
///
/// GET /games/recent
#[instrument(name = "recent_games", skip(state))]
pub async fn recent_games(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let service = GameService::new(
        Arc::clone(&state.game_repository),
        Arc::clone(&state.player_repository),
    );
    let games = service.recent_games(RECENT_GAMES_DEFAULT).await?;

    info!(game_count = games.len(), "Recent games listed");

    Ok(Json(games.into_iter().map(Into::into).collect()))
}
