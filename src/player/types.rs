use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::PlayerModel;
use crate::game::types::GameResponse;

/// Request payload for registering a player
#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    #[serde(default)]
    pub name: String,
}

/// Request payload for renaming a player
#[derive(Debug, Deserialize)]
pub struct RenamePlayerRequest {
    #[serde(default)]
    pub name: String,
}

/// Response for player state, including the derived display fields
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub id: String,
    pub name: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub incomplete: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub playtime: i64,
    pub last_played: Option<DateTime<Utc>>,
    /// Absent until the player has finished a game.
    pub win_percent: Option<f64>,
    pub stats: String,
}

impl From<PlayerModel> for PlayerResponse {
    fn from(player: PlayerModel) -> Self {
        let win_percent = player.win_percent();
        let stats = player.stats_line();
        Self {
            id: player.id,
            name: player.name,
            games: player.games,
            wins: player.wins,
            losses: player.losses,
            incomplete: player.incomplete,
            points_for: player.points_for,
            points_against: player.points_against,
            playtime: player.playtime,
            last_played: player.last_played,
            win_percent,
            stats,
        }
    }
}

/// Response for a single player's page: the record plus recent games.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerDetailResponse {
    pub player: PlayerResponse,
    pub recent_games: Vec<GameResponse>,
}

/// Response for the index page.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexResponse {
    pub players: u64,
}
