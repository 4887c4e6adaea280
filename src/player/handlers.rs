use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::registry::{PlayerRegistry, RECENT_GAMES_PER_PLAYER};
use super::types::{
    CreatePlayerRequest, IndexResponse, PlayerDetailResponse, PlayerResponse, RenamePlayerRequest,
};
use crate::shared::{AppError, AppState};

fn registry(state: &AppState) -> PlayerRegistry {
    PlayerRegistry::new(
        Arc::clone(&state.player_repository),
        Arc::clone(&state.game_repository),
    )
}

/// HTTP handler for the index page
///
/// GET /
/// Returns the number of registered players
#[instrument(name = "index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<IndexResponse>, AppError> {
    let players = registry(&state).player_count().await?;
    Ok(Json(IndexResponse { players }))
}

/// HTTP handler for registering a player
///
/// POST /players
#[instrument(name = "create_player", skip(state))]
pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    let player = registry(&state).create(&request.name).await?;

    info!(player_id = %player.id, name = %player.name, "Player created");

    Ok(Json(player.into()))
}

/// HTTP handler for listing players
///
/// GET /players
/// Returns all players sorted by name
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    let players = registry(&state).list().await?;

    info!(player_count = players.len(), "Players listed");

    Ok(Json(players.into_iter().map(Into::into).collect()))
}

/// HTTP handler for a single player
///
/// GET /players/{id}
/// Returns the player plus their most recent games
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerDetailResponse>, AppError> {
    let registry = registry(&state);
    let player = registry.fetch(&player_id).await?;
    let recent_games = registry
        .recent_games(&player_id, RECENT_GAMES_PER_PLAYER)
        .await?;

    Ok(Json(PlayerDetailResponse {
        player: player.into(),
        recent_games: recent_games.into_iter().map(Into::into).collect(),
    }))
}

/// HTTP handler for renaming a player
///
/// PUT /players/{id}/name
#[instrument(name = "rename_player", skip(state))]
pub async fn rename_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(request): Json<RenamePlayerRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    let player = registry(&state).rename(&player_id, &request.name).await?;

    info!(player_id = %player.id, name = %player.name, "Player renamed");

    Ok(Json(player.into()))
}
