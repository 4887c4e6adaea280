use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::errors::PlayerError;
use super::models::PlayerModel;

/// Trait for player storage operations.
///
/// Ids are opaque strings. A string that is not a valid id for the backing
/// store is treated as "not found", never as an error.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Persists a new player and assigns its id.
    async fn create(&self, player: PlayerModel) -> Result<PlayerModel, PlayerError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<PlayerModel>, PlayerError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerModel>, PlayerError>;
    async fn list_all(&self) -> Result<Vec<PlayerModel>, PlayerError>;
    async fn update(&self, player: &PlayerModel) -> Result<(), PlayerError>;
    async fn delete(&self, id: &str) -> Result<(), PlayerError>;
    async fn count(&self) -> Result<u64, PlayerError>;
}

/// In-memory implementation of PlayerRepository for development and testing
///
/// Data is stored in memory and lost when the application restarts.
pub struct InMemoryPlayerRepository {
    players: Mutex<HashMap<String, PlayerModel>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self {
            players: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create(&self, mut player: PlayerModel) -> Result<PlayerModel, PlayerError> {
        player.id = Uuid::new_v4().to_string();
        debug!(player_id = %player.id, name = %player.name, "Creating player in memory");

        let mut players = self.players.lock().unwrap();
        players.insert(player.id.clone(), player.clone());
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<PlayerModel>, PlayerError> {
        let players = self.players.lock().unwrap();
        Ok(players.get(id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerModel>, PlayerError> {
        let players = self.players.lock().unwrap();
        Ok(players.values().find(|p| p.name == name).cloned())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<PlayerModel>, PlayerError> {
        let players = self.players.lock().unwrap();
        Ok(players.values().cloned().collect())
    }

    #[instrument(skip(self, player))]
    async fn update(&self, player: &PlayerModel) -> Result<(), PlayerError> {
        let mut players = self.players.lock().unwrap();
        if !players.contains_key(&player.id) {
            warn!(player_id = %player.id, "Player not found for update in memory");
            return Err(PlayerError::NotFound("Player not found".to_string()));
        }
        players.insert(player.id.clone(), player.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), PlayerError> {
        let mut players = self.players.lock().unwrap();
        if players.remove(id).is_none() {
            warn!(player_id = %id, "Player not found for deletion in memory");
            return Err(PlayerError::NotFound("Player not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, PlayerError> {
        let players = self.players.lock().unwrap();
        Ok(players.len() as u64)
    }
}

/// PostgreSQL implementation of PlayerRepository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn player_from_row(row: &PgRow) -> PlayerModel {
    let id: Uuid = row.get("id");
    PlayerModel {
        id: id.to_string(),
        name: row.get("name"),
        games: row.get::<i64, _>("games") as u32,
        wins: row.get::<i64, _>("wins") as u32,
        losses: row.get::<i64, _>("losses") as u32,
        incomplete: row.get::<i64, _>("incomplete") as u32,
        points_for: row.get::<i64, _>("points_for") as u32,
        points_against: row.get::<i64, _>("points_against") as u32,
        playtime: row.get("playtime"),
        last_played: row.get("last_played"),
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create(&self, mut player: PlayerModel) -> Result<PlayerModel, PlayerError> {
        let id = Uuid::new_v4();
        debug!(player_id = %id, name = %player.name, "Creating player in database");

        sqlx::query(
            "INSERT INTO players (id, name, games, wins, losses, incomplete, points_for, points_against, playtime, last_played) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(id)
        .bind(&player.name)
        .bind(player.games as i64)
        .bind(player.wins as i64)
        .bind(player.losses as i64)
        .bind(player.incomplete as i64)
        .bind(player.points_for as i64)
        .bind(player.points_against as i64)
        .bind(player.playtime)
        .bind(player.last_played)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create player in database");
            PlayerError::Storage(e.to_string())
        })?;

        player.id = id.to_string();
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<PlayerModel>, PlayerError> {
        // A malformed id means the record cannot exist.
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query("SELECT * FROM players WHERE id = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %id, "Failed to fetch player from database");
                PlayerError::Storage(e.to_string())
            })?;

        Ok(row.as_ref().map(player_from_row))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<PlayerModel>, PlayerError> {
        let row = sqlx::query("SELECT * FROM players WHERE name = $1 LIMIT 1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch player by name from database");
                PlayerError::Storage(e.to_string())
            })?;

        Ok(row.as_ref().map(player_from_row))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<PlayerModel>, PlayerError> {
        let rows = sqlx::query("SELECT * FROM players")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list players from database");
                PlayerError::Storage(e.to_string())
            })?;

        Ok(rows.iter().map(player_from_row).collect())
    }

    #[instrument(skip(self, player))]
    async fn update(&self, player: &PlayerModel) -> Result<(), PlayerError> {
        let Ok(uuid) = Uuid::parse_str(&player.id) else {
            return Err(PlayerError::NotFound("Player not found".to_string()));
        };

        let result = sqlx::query(
            "UPDATE players SET name = $2, games = $3, wins = $4, losses = $5, incomplete = $6, \
             points_for = $7, points_against = $8, playtime = $9, last_played = $10 WHERE id = $1",
        )
        .bind(uuid)
        .bind(&player.name)
        .bind(player.games as i64)
        .bind(player.wins as i64)
        .bind(player.losses as i64)
        .bind(player.incomplete as i64)
        .bind(player.points_for as i64)
        .bind(player.points_against as i64)
        .bind(player.playtime)
        .bind(player.last_played)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_id = %player.id, "Failed to update player in database");
            PlayerError::Storage(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            warn!(player_id = %player.id, "Player not found for update");
            return Err(PlayerError::NotFound("Player not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), PlayerError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(PlayerError::NotFound("Player not found".to_string()));
        };

        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(uuid)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, player_id = %id, "Failed to delete player from database");
                PlayerError::Storage(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(PlayerError::NotFound("Player not found".to_string()));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, PlayerError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to count players in database");
                PlayerError::Storage(e.to_string())
            })?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_an_id() {
        let repo = InMemoryPlayerRepository::new();
        let player = repo
            .create(PlayerModel::new("Alice".to_string()))
            .await
            .unwrap();

        assert!(!player.id.is_empty());

        let found = repo.find_by_id(&player.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let repo = InMemoryPlayerRepository::new();
        let found = repo.find_by_id("not-even-a-uuid").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_by_name_matches_exactly() {
        let repo = InMemoryPlayerRepository::new();
        repo.create(PlayerModel::new("Alice".to_string()))
            .await
            .unwrap();

        assert!(repo.find_by_name("Alice").await.unwrap().is_some());
        assert!(repo.find_by_name("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_roundtrips_changes() {
        let repo = InMemoryPlayerRepository::new();
        let mut player = repo
            .create(PlayerModel::new("Alice".to_string()))
            .await
            .unwrap();

        player.wins = 2;
        player.games = 2;
        repo.update(&player).await.unwrap();

        let found = repo.find_by_id(&player.id).await.unwrap().unwrap();
        assert_eq!(found.wins, 2);
    }

    #[tokio::test]
    async fn update_unknown_player_fails() {
        let repo = InMemoryPlayerRepository::new();
        let mut player = PlayerModel::new("Ghost".to_string());
        player.id = "missing".to_string();

        let result = repo.update(&player).await;
        assert!(matches!(result.unwrap_err(), PlayerError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let repo = InMemoryPlayerRepository::new();
        let player = repo
            .create(PlayerModel::new("Alice".to_string()))
            .await
            .unwrap();

        repo.delete(&player.id).await.unwrap();
        assert!(repo.find_by_id(&player.id).await.unwrap().is_none());
        assert!(repo.delete(&player.id).await.is_err());
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let repo = InMemoryPlayerRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(PlayerModel::new("Alice".to_string()))
            .await
            .unwrap();
        repo.create(PlayerModel::new("Bob".to_string()))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
