use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::errors::PlayerError;
use super::models::{PlayerModel, MAX_NAME_LEN};
use super::repository::PlayerRepository;
use crate::game::models::GameModel;
use crate::game::repository::GameRepository;

/// How many of a player's games their profile shows.
pub const RECENT_GAMES_PER_PLAYER: usize = 3;

/// Owns player identity and uniqueness rules.
///
/// Lifetime statistics are only ever mutated by the game service when a
/// match reaches a terminal state; the registry itself touches nothing but
/// identity fields.
pub struct PlayerRegistry {
    players: Arc<dyn PlayerRepository>,
    games: Arc<dyn GameRepository>,
}

impl PlayerRegistry {
    pub fn new(players: Arc<dyn PlayerRepository>, games: Arc<dyn GameRepository>) -> Self {
        Self { players, games }
    }

    /// True iff a player with exactly this name is stored.
    #[instrument(skip(self))]
    pub async fn exists(&self, name: &str) -> Result<bool, PlayerError> {
        Ok(self.players.find_by_name(name).await?.is_some())
    }

    /// Name checks run in a fixed order: empty, then taken, then too long.
    /// The uniqueness check sees the raw candidate before any length cut.
    #[instrument(skip(self))]
    pub async fn validate_name(&self, name: &str) -> Result<(), PlayerError> {
        if name.is_empty() {
            return Err(PlayerError::InvalidName("Tell me your name!".to_string()));
        }
        if self.exists(name).await? {
            return Err(PlayerError::DuplicateName(
                "That name is already taken!".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(PlayerError::InvalidName(
                "That name is way too long!".to_string(),
            ));
        }
        Ok(())
    }

    /// Registers a new player with a zeroed record.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<PlayerModel, PlayerError> {
        self.validate_name(name).await?;
        let player = self.players.create(PlayerModel::new(name.to_string())).await?;
        info!(player_id = %player.id, name = %player.name, "Player registered");
        Ok(player)
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, id: &str) -> Result<PlayerModel, PlayerError> {
        self.players
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlayerError::NotFound("Who are you looking for?".to_string()))
    }

    /// Renames a player after re-running the full name validation.
    #[instrument(skip(self))]
    pub async fn rename(&self, id: &str, new_name: &str) -> Result<PlayerModel, PlayerError> {
        let mut player = self.fetch(id).await?;
        self.validate_name(new_name).await?;
        player.name = new_name.to_string();
        self.players.update(&player).await?;
        info!(player_id = %player.id, name = %player.name, "Player renamed");
        Ok(player)
    }

    /// This player's games, most recent first.
    #[instrument(skip(self))]
    pub async fn recent_games(
        &self,
        player_id: &str,
        count: usize,
    ) -> Result<Vec<GameModel>, PlayerError> {
        self.games
            .recent_for_player(player_id, count)
            .await
            .map_err(|e| PlayerError::Storage(e.to_string()))
    }

    /// All players, sorted by name.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<PlayerModel>, PlayerError> {
        let mut players = self.players.list_all().await?;
        players.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(player_count = players.len(), "Listed players");
        Ok(players)
    }

    #[instrument(skip(self))]
    pub async fn player_count(&self) -> Result<u64, PlayerError> {
        self.players.count().await
    }
}
