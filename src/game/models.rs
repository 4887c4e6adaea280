use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::errors::GameError;

/// Score at which the scoring player wins the match.
pub const WIN_THRESHOLD: u32 = 5;

/// Sentinel scorer id for a null event; recording it changes nothing.
pub const NO_SCORER: &str = "nobody";

/// One scoring event in a game's timeline. Insertion order is
/// chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub scorer: String,
    pub at: DateTime<Utc>,
}

/// What recording a goal did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Null event; the game was not touched.
    Ignored,
    /// The score moved and play continues.
    Scored,
    /// The goal reached the winning threshold; the game is now terminal.
    Won,
}

/// A single match between two players.
///
/// The game is in progress while `end` is unset and terminal afterwards.
/// Terminal is absorbing: no transition mutates a terminal game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameModel {
    /// Assigned by the repository on first insert; empty until then.
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// Exactly two distinct player ids, in seating order.
    pub players: [String; 2],
    /// Keyed by exactly the two ids in `players`.
    pub scores: HashMap<String, u32>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub timeline: Vec<ScoreEvent>,
    /// True only when the game ended through an abort.
    pub incomplete: bool,
    /// Bumped by the repository on every successful update.
    pub revision: i64,
}

impl GameModel {
    pub fn new(player_a: String, player_b: String) -> Self {
        let scores = HashMap::from([(player_a.clone(), 0), (player_b.clone(), 0)]);
        Self {
            id: String::new(),
            start: Utc::now(),
            end: None,
            players: [player_a, player_b],
            scores,
            winner: None,
            loser: None,
            timeline: Vec::new(),
            incomplete: false,
            revision: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.end.is_some()
    }

    pub fn score_of(&self, player_id: &str) -> u32 {
        self.scores.get(player_id).copied().unwrap_or(0)
    }

    /// The other seat's player id.
    pub fn opponent_of(&self, player_id: &str) -> &str {
        if self.players[0] == player_id {
            &self.players[1]
        } else {
            &self.players[0]
        }
    }

    /// Records a goal and advances the state machine.
    ///
    /// The null scorer is accepted before membership is checked, so a
    /// null event against a live game never errors.
    pub fn record_goal(&mut self, scorer: &str, at: DateTime<Utc>) -> Result<PlayOutcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver("That game's already over.".to_string()));
        }
        if scorer == NO_SCORER {
            return Ok(PlayOutcome::Ignored);
        }
        if !self.players.iter().any(|p| p == scorer) {
            return Err(GameError::Validation(
                "Who did you say scored?".to_string(),
            ));
        }

        self.timeline.push(ScoreEvent {
            scorer: scorer.to_string(),
            at,
        });
        let tally = self.scores.entry(scorer.to_string()).or_insert(0);
        *tally += 1;

        if *tally < WIN_THRESHOLD {
            return Ok(PlayOutcome::Scored);
        }

        let loser = self.opponent_of(scorer).to_string();
        self.winner = Some(scorer.to_string());
        self.loser = Some(loser);
        self.end = Some(at);
        Ok(PlayOutcome::Won)
    }

    /// Ends the game early, without a natural winner.
    ///
    /// Attribution is positional: the first seat goes down as winner, the
    /// second as loser, regardless of the score.
    pub fn mark_abandoned(&mut self, at: DateTime<Utc>) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver("Games can't end twice.".to_string()));
        }
        self.winner = Some(self.players[0].clone());
        self.loser = Some(self.players[1].clone());
        self.incomplete = true;
        self.end = Some(at);
        Ok(())
    }

    /// Whole seconds between start and end; zero while in progress.
    pub fn playtime_secs(&self) -> i64 {
        match self.end {
            Some(end) => (end - self.start).num_seconds(),
            None => 0,
        }
    }
}
