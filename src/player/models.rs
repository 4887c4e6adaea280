use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest name the registry accepts, in characters.
pub const MAX_NAME_LEN: usize = 24;

/// Name substituted when a game references a player that no longer exists.
pub const PLACEHOLDER_NAME: &str = "Anonymous";

/// A registered player and their lifetime record.
///
/// Counters only move when a game reaches a terminal state, so
/// `games == wins + losses + incomplete` holds between operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerModel {
    /// Assigned by the repository on first insert; empty until then.
    pub id: String,
    pub name: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub incomplete: u32,
    pub points_for: u32,
    pub points_against: u32,
    /// Accumulated time on the table, in whole seconds.
    pub playtime: i64,
    pub last_played: Option<DateTime<Utc>>,
}

impl PlayerModel {
    /// A fresh player with a zeroed record. The id is assigned on insert.
    pub fn new(name: String) -> Self {
        Self {
            id: String::new(),
            name,
            games: 0,
            wins: 0,
            losses: 0,
            incomplete: 0,
            points_for: 0,
            points_against: 0,
            playtime: 0,
            last_played: None,
        }
    }

    /// Stand-in for a deleted participant so game views never dangle.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_NAME.to_string())
    }

    /// Fraction of games won, rounded to three decimal places.
    /// `None` until the player has finished at least one game.
    pub fn win_percent(&self) -> Option<f64> {
        if self.games == 0 {
            return None;
        }
        Some((self.wins as f64 / self.games as f64 * 1000.0).round() / 1000.0)
    }

    /// The "(wins-losses-incomplete)" display string.
    pub fn stats_line(&self) -> String {
        format!("({}-{}-{})", self.wins, self.losses, self.incomplete)
    }

    /// Applies one finished game to the lifetime record.
    pub fn record_result(
        &mut self,
        won: bool,
        scored: u32,
        conceded: u32,
        playtime: i64,
        finished_at: DateTime<Utc>,
    ) {
        self.points_for += scored;
        self.points_against += conceded;
        self.playtime += playtime;
        self.games += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.last_played = Some(finished_at);
    }

    /// Applies an aborted game. Both sides get the same treatment: the
    /// game counts, but neither the score columns nor `last_played` move.
    pub fn record_abandoned(&mut self, playtime: i64) {
        self.incomplete += 1;
        self.games += 1;
        self.playtime += playtime;
    }
}
