use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::errors::GameError;
use super::models::{GameModel, ScoreEvent};

/// Trait for game storage operations.
///
/// Updates are revision-checked: two callers racing the same snapshot
/// cannot silently overwrite each other's read-modify-write. The loser of
/// the race gets a Conflict and must re-fetch.
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Persists a new game and assigns its id.
    async fn create(&self, game: GameModel) -> Result<GameModel, GameError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<GameModel>, GameError>;
    /// Stores the game if its revision still matches, bumping it by one.
    async fn update(&self, game: &GameModel) -> Result<GameModel, GameError>;
    /// Started games, most recent first.
    async fn recent(&self, limit: usize) -> Result<Vec<GameModel>, GameError>;
    /// Started games featuring the given player, most recent first.
    async fn recent_for_player(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Vec<GameModel>, GameError>;
}

/// In-memory implementation of GameRepository for development and testing
pub struct InMemoryGameRepository {
    games: Arc<RwLock<HashMap<String, GameModel>>>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self, game))]
    async fn create(&self, mut game: GameModel) -> Result<GameModel, GameError> {
        game.id = Uuid::new_v4().to_string();
        debug!(game_id = %game.id, "Creating game in memory");

        let mut games = self.games.write().await;
        games.insert(game.id.clone(), game.clone());
        Ok(game)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<GameModel>, GameError> {
        let games = self.games.read().await;
        Ok(games.get(id).cloned())
    }

    #[instrument(skip(self, game))]
    async fn update(&self, game: &GameModel) -> Result<GameModel, GameError> {
        let mut games = self.games.write().await;
        let stored = games
            .get(&game.id)
            .ok_or_else(|| GameError::NotFound("Game not found".to_string()))?;

        if stored.revision != game.revision {
            warn!(
                game_id = %game.id,
                held = game.revision,
                stored = stored.revision,
                "Stale game update rejected"
            );
            return Err(GameError::Conflict(format!(
                "game {} was updated concurrently",
                game.id
            )));
        }

        let mut next = game.clone();
        next.revision += 1;
        games.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: usize) -> Result<Vec<GameModel>, GameError> {
        let games = self.games.read().await;
        let mut recent: Vec<GameModel> = games.values().cloned().collect();
        recent.sort_by(|a, b| b.start.cmp(&a.start));
        recent.truncate(limit);
        Ok(recent)
    }

    #[instrument(skip(self))]
    async fn recent_for_player(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Vec<GameModel>, GameError> {
        let games = self.games.read().await;
        let mut recent: Vec<GameModel> = games
            .values()
            .filter(|g| g.players.iter().any(|p| p == player_id))
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.start.cmp(&a.start));
        recent.truncate(limit);
        Ok(recent)
    }
}

/// PostgreSQL implementation of GameRepository
pub struct PostgresGameRepository {
    pool: PgPool,
}

impl PostgresGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn game_from_row(row: &PgRow) -> GameModel {
    let id: Uuid = row.get("id");
    let scores: Json<HashMap<String, u32>> = row.get("scores");
    let timeline: Json<Vec<ScoreEvent>> = row.get("timeline");
    GameModel {
        id: id.to_string(),
        start: row.get("start_time"),
        end: row.get("end_time"),
        players: [row.get("player_a"), row.get("player_b")],
        scores: scores.0,
        winner: row.get("winner"),
        loser: row.get("loser"),
        timeline: timeline.0,
        incomplete: row.get("incomplete"),
        revision: row.get("revision"),
    }
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    #[instrument(skip(self, game))]
    async fn create(&self, mut game: GameModel) -> Result<GameModel, GameError> {
        let id = Uuid::new_v4();
        debug!(game_id = %id, "Creating game in database");

        sqlx::query(
            "INSERT INTO games (id, start_time, end_time, player_a, player_b, scores, winner, loser, timeline, incomplete, revision) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(id)
        .bind(game.start)
        .bind(game.end)
        .bind(&game.players[0])
        .bind(&game.players[1])
        .bind(Json(&game.scores))
        .bind(&game.winner)
        .bind(&game.loser)
        .bind(Json(&game.timeline))
        .bind(game.incomplete)
        .bind(game.revision)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create game in database");
            GameError::Storage(e.to_string())
        })?;

        game.id = id.to_string();
        Ok(game)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<GameModel>, GameError> {
        // A malformed id means the record cannot exist.
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query("SELECT * FROM games WHERE id = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, game_id = %id, "Failed to fetch game from database");
                GameError::Storage(e.to_string())
            })?;

        Ok(row.as_ref().map(game_from_row))
    }

    #[instrument(skip(self, game))]
    async fn update(&self, game: &GameModel) -> Result<GameModel, GameError> {
        let Ok(uuid) = Uuid::parse_str(&game.id) else {
            return Err(GameError::NotFound("Game not found".to_string()));
        };

        let result = sqlx::query(
            "UPDATE games SET end_time = $2, scores = $3, winner = $4, loser = $5, timeline = $6, \
             incomplete = $7, revision = revision + 1 WHERE id = $1 AND revision = $8",
        )
        .bind(uuid)
        .bind(game.end)
        .bind(Json(&game.scores))
        .bind(&game.winner)
        .bind(&game.loser)
        .bind(Json(&game.timeline))
        .bind(game.incomplete)
        .bind(game.revision)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, game_id = %game.id, "Failed to update game in database");
            GameError::Storage(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            // Missing row and stale revision are indistinguishable here;
            // look again to report the right failure.
            return match self.find_by_id(&game.id).await? {
                Some(_) => {
                    warn!(game_id = %game.id, "Stale game update rejected");
                    Err(GameError::Conflict(format!(
                        "game {} was updated concurrently",
                        game.id
                    )))
                }
                None => Err(GameError::NotFound("Game not found".to_string())),
            };
        }

        let mut next = game.clone();
        next.revision += 1;
        Ok(next)
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: usize) -> Result<Vec<GameModel>, GameError> {
        let rows = sqlx::query("SELECT * FROM games ORDER BY start_time DESC LIMIT $1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to list recent games from database");
                GameError::Storage(e.to_string())
            })?;

        Ok(rows.iter().map(game_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn recent_for_player(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<Vec<GameModel>, GameError> {
        let rows = sqlx::query(
            "SELECT * FROM games WHERE player_a = $1 OR player_b = $1 \
             ORDER BY start_time DESC LIMIT $2",
        )
        .bind(player_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_id = %player_id, "Failed to list player games from database");
            GameError::Storage(e.to_string())
        })?;

        Ok(rows.iter().map(game_from_row).collect())
    }
}
