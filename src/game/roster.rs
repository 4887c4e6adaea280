use std::collections::HashMap;

use super::errors::GameError;
use super::models::GameModel;
use crate::player::models::PlayerModel;
use crate::player::repository::PlayerRepository;

/// A resolved participant together with their score in this game.
///
/// The score lives here, not on the player record: it is a per-game view
/// and is never persisted back.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RosterEntry {
    pub player: PlayerModel,
    pub score: u32,
}

/// Non-persisted lookup table of a game's participants.
///
/// Built once per game instance so display code can resolve seats without
/// going back to the store. A participant that no longer resolves comes
/// back as an anonymous placeholder; the lookup itself never fails.
pub struct GameRoster {
    game: GameModel,
    lookup: HashMap<String, PlayerModel>,
}

impl GameRoster {
    pub async fn load(
        game: GameModel,
        players: &dyn PlayerRepository,
    ) -> Result<Self, GameError> {
        let mut lookup = HashMap::new();
        for id in &game.players {
            let player = players
                .find_by_id(id)
                .await?
                .unwrap_or_else(PlayerModel::placeholder);
            lookup.insert(id.clone(), player);
        }
        Ok(Self { game, lookup })
    }

    pub fn game(&self) -> &GameModel {
        &self.game
    }

    pub fn into_game(self) -> GameModel {
        self.game
    }

    /// Resolves a seat by player id, attaching the current in-game score.
    pub fn entry(&self, player_id: &str) -> RosterEntry {
        let player = self
            .lookup
            .get(player_id)
            .cloned()
            .unwrap_or_else(PlayerModel::placeholder);
        RosterEntry {
            score: self.game.score_of(player_id),
            player,
        }
    }

    /// First display seat: the winner once the game is decided.
    pub fn player1(&self) -> RosterEntry {
        match &self.game.winner {
            Some(winner) => self.entry(winner),
            None => self.entry(&self.game.players[0]),
        }
    }

    /// Second display seat: the loser once the game is decided.
    pub fn player2(&self) -> RosterEntry {
        match &self.game.loser {
            Some(loser) => self.entry(loser),
            None => self.entry(&self.game.players[1]),
        }
    }
}
