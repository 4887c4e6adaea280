use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use super::errors::GameError;
use super::models::{GameModel, PlayOutcome};
use super::repository::GameRepository;
use super::roster::GameRoster;
use crate::player::errors::PlayerError;
use crate::player::models::PlayerModel;
use crate::player::repository::PlayerRepository;

/// How many games the recent-games listing shows by default.
pub const RECENT_GAMES_DEFAULT: usize = 5;

/// Drives a match from begin through play to a terminal state.
///
/// Player records are referenced by id only; when a game finishes, the
/// service fetches both participants from the player repository and writes
/// their updated statistics back.
pub struct GameService {
    games: Arc<dyn GameRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl GameService {
    pub fn new(games: Arc<dyn GameRepository>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { games, players }
    }

    /// Starts a game between exactly two registered players.
    #[instrument(skip(self))]
    pub async fn begin(&self, player_ids: &[String]) -> Result<GameModel, GameError> {
        match player_ids.len() {
            0 => {
                return Err(GameError::Validation("Nobody wants to play?".to_string()));
            }
            1 => {
                return Err(GameError::Validation("Playing with yourself?".to_string()));
            }
            2 => {}
            _ => {
                return Err(GameError::Validation("Only two at a time!".to_string()));
            }
        }
        if player_ids[0] == player_ids[1] {
            return Err(GameError::Validation("Playing with yourself?".to_string()));
        }
        for id in player_ids {
            if self.players.find_by_id(id).await?.is_none() {
                return Err(GameError::Validation(
                    "Who did you say was playing?".to_string(),
                ));
            }
        }

        let game = self
            .games
            .create(GameModel::new(player_ids[0].clone(), player_ids[1].clone()))
            .await?;
        info!(game_id = %game.id, "Game started");
        Ok(game)
    }

    /// Records a goal against an in-progress game.
    ///
    /// A fifth goal ends the game and writes both participants' lifetime
    /// statistics. That write sequence (game, then loser, then winner) is
    /// not atomic in the store: a crash between the game save and the
    /// player saves leaves the players' counters behind the game record.
    #[instrument(skip(self))]
    pub async fn play(&self, game_id: &str, scorer: Option<&str>) -> Result<GameModel, GameError> {
        let scorer = match scorer {
            Some(s) if !s.is_empty() => s,
            _ => return Err(GameError::Validation("Who scored?".to_string())),
        };

        let mut game = self
            .games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| GameError::NotFound("What game are you playing?".to_string()))?;

        let now = Utc::now();
        match game.record_goal(scorer, now)? {
            PlayOutcome::Ignored => Ok(game),
            PlayOutcome::Scored => self.games.update(&game).await,
            PlayOutcome::Won => {
                let winner_id = scorer.to_string();
                let loser_id = game.opponent_of(scorer).to_string();
                self.settle_win(game, &winner_id, &loser_id, now).await
            }
        }
    }

    /// Ends a game without a natural winner.
    ///
    /// Both participants are treated the same: the abort counts against
    /// neither record beyond the `incomplete` column, whatever the score
    /// stood at. The stored winner/loser fields get the positional
    /// attribution from [`GameModel::mark_abandoned`].
    #[instrument(skip(self))]
    pub async fn abort(&self, game_id: &str) -> Result<GameModel, GameError> {
        let mut game = self
            .games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| {
                GameError::NotFound("Which game are you trying to end?".to_string())
            })?;

        game.mark_abandoned(Utc::now())?;
        let playtime = game.playtime_secs();

        let mut first = self.participant(&game.players[0]).await?;
        let mut second = self.participant(&game.players[1]).await?;
        first.record_abandoned(playtime);
        second.record_abandoned(playtime);

        let saved = self.games.update(&game).await?;
        self.players.update(&first).await?;
        self.players.update(&second).await?;

        info!(game_id = %saved.id, playtime, "Game abandoned");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, game_id: &str) -> Result<GameModel, GameError> {
        self.games
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| GameError::NotFound("Which game are you looking for?".to_string()))
    }

    /// The game plus both participants resolved for display.
    #[instrument(skip(self))]
    pub async fn roster(&self, game_id: &str) -> Result<GameRoster, GameError> {
        let game = self.fetch(game_id).await?;
        GameRoster::load(game, self.players.as_ref()).await
    }

    /// Started games, most recent first.
    #[instrument(skip(self))]
    pub async fn recent_games(&self, count: usize) -> Result<Vec<GameModel>, GameError> {
        self.games.recent(count).await
    }

    async fn participant(&self, player_id: &str) -> Result<PlayerModel, GameError> {
        Ok(self
            .players
            .find_by_id(player_id)
            .await?
            .ok_or_else(|| PlayerError::NotFound("Who are you looking for?".to_string()))?)
    }

    /// Applies a finished game to both lifetime records.
    ///
    /// Persistence order is game first, then loser, then winner. Both
    /// players are fetched up front, so a dangling participant fails the
    /// whole transition before anything is written.
    async fn settle_win(
        &self,
        game: GameModel,
        winner_id: &str,
        loser_id: &str,
        finished_at: DateTime<Utc>,
    ) -> Result<GameModel, GameError> {
        let playtime = game.playtime_secs();
        let winner_score = game.score_of(winner_id);
        let loser_score = game.score_of(loser_id);

        let mut loser = self.participant(loser_id).await?;
        let mut winner = self.participant(winner_id).await?;
        loser.record_result(false, loser_score, winner_score, playtime, finished_at);
        winner.record_result(true, winner_score, loser_score, playtime, finished_at);

        let saved = self.games.update(&game).await?;
        self.players.update(&loser).await?;
        self.players.update(&winner).await?;

        info!(
            game_id = %saved.id,
            winner = %winner_id,
            loser = %loser_id,
            playtime,
            "Game finished"
        );
        Ok(saved)
    }
}
