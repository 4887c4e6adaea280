use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{GameModel, ScoreEvent};
use super::roster::{GameRoster, RosterEntry};
use crate::player::types::PlayerResponse;

/// Request payload for starting a game
#[derive(Debug, Deserialize)]
pub struct BeginGameRequest {
    #[serde(default)]
    pub players: Vec<String>,
}

/// Request payload for recording a goal
#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub scorer: Option<String>,
}

/// Response for game state
#[derive(Debug, Serialize, Deserialize)]
pub struct GameResponse {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub players: [String; 2],
    pub scores: HashMap<String, u32>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub timeline: Vec<ScoreEvent>,
    pub incomplete: bool,
}

impl From<GameModel> for GameResponse {
    fn from(game: GameModel) -> Self {
        Self {
            id: game.id,
            start: game.start,
            end: game.end,
            players: game.players,
            scores: game.scores,
            winner: game.winner,
            loser: game.loser,
            timeline: game.timeline,
            incomplete: game.incomplete,
        }
    }
}

/// One seat in a game view: the resolved player plus their score here.
#[derive(Debug, Serialize, Deserialize)]
pub struct SeatResponse {
    pub player: PlayerResponse,
    pub score: u32,
}

impl From<RosterEntry> for SeatResponse {
    fn from(entry: RosterEntry) -> Self {
        Self {
            player: entry.player.into(),
            score: entry.score,
        }
    }
}

/// Response for a single game with both seats resolved.
/// Once the game is decided, the winner holds the first seat.
#[derive(Debug, Serialize, Deserialize)]
pub struct GameDetailResponse {
    pub game: GameResponse,
    pub player1: SeatResponse,
    pub player2: SeatResponse,
}

impl From<GameRoster> for GameDetailResponse {
    fn from(roster: GameRoster) -> Self {
        Self {
            player1: roster.player1().into(),
            player2: roster.player2().into(),
            game: roster.into_game().into(),
        }
    }
}
