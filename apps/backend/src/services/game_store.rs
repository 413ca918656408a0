//! Game persistence behind an explicit interface.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{GameId, GameState};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Keyed storage of whole game states. Implementations do not serialise
/// writers; the game-flow service does that per game id.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn get(&self, id: GameId) -> Result<Option<GameState>, AppError>;
    async fn put(&self, state: GameState) -> Result<(), AppError>;
    /// Returns whether a game was removed.
    async fn delete(&self, id: GameId) -> Result<bool, AppError>;
    async fn ids(&self) -> Result<Vec<GameId>, AppError>;
}

/// Load a game or fail with `GAME_NOT_FOUND`.
pub async fn require_game(store: &dyn GameStore, id: GameId) -> Result<GameState, AppError> {
    store
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::GameNotFound, format!("Game {id} not found")))
}

#[derive(Default)]
pub struct InMemoryGameStore {
    games: DashMap<GameId, GameState>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn get(&self, id: GameId) -> Result<Option<GameState>, AppError> {
        Ok(self.games.get(&id).map(|entry| entry.value().clone()))
    }

    async fn put(&self, state: GameState) -> Result<(), AppError> {
        self.games.insert(state.game_id, state);
        Ok(())
    }

    async fn delete(&self, id: GameId) -> Result<bool, AppError> {
        Ok(self.games.remove(&id).is_some())
    }

    async fn ids(&self) -> Result<Vec<GameId>, AppError> {
        let mut ids: Vec<GameId> = self.games.iter().map(|entry| *entry.key()).collect();
        ids.sort();
        Ok(ids)
    }
}
