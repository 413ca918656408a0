use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::info;

use crate::domain::game_transition::{derive_game_transitions, GameLifecycleView, GameTransition};
use crate::domain::{GameId, GameState};
use crate::error::AppError;
use crate::services::game_flow::GameFlowService;
use crate::services::game_store::require_game;

#[derive(Debug)]
pub struct GameFlowMutationResult<T = ()> {
    pub state: GameState,
    pub outcome: T,
    pub transitions: Vec<GameTransition>,
}

/// A locked, loaded game. Dropping it without [`GameFlowService::commit`]
/// discards every change.
pub(super) struct GameSession {
    _guard: OwnedMutexGuard<()>,
    pub(super) state: GameState,
    before: GameLifecycleView,
}

impl GameFlowService {
    fn game_lock(&self, id: GameId) -> Arc<AsyncMutex<()>> {
        self.locks.entry(id).or_default().clone()
    }

    pub(super) async fn open(&self, id: GameId) -> Result<GameSession, AppError> {
        let guard = self.game_lock(id).lock_owned().await;
        let state = require_game(self.store.as_ref(), id).await?;
        let before = GameLifecycleView::of(&state);
        Ok(GameSession {
            _guard: guard,
            state,
            before,
        })
    }

    pub(super) async fn commit<T>(
        &self,
        session: GameSession,
        outcome: T,
    ) -> Result<GameFlowMutationResult<T>, AppError> {
        let GameSession {
            _guard,
            state,
            before,
        } = session;
        let after = GameLifecycleView::of(&state);
        let transitions = derive_game_transitions(&before, &after);
        for transition in &transitions {
            info!(game_id = %state.game_id, ?transition, "game transition");
        }
        self.store.put(state.clone()).await?;
        Ok(GameFlowMutationResult {
            state,
            outcome,
            transitions,
        })
    }

    /// Drop the lock entry of a deleted game.
    pub(super) fn forget_lock(&self, id: GameId) {
        self.locks.remove(&id);
    }
}
