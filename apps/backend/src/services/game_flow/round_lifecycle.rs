use tracing::{debug, info};

use super::{GameFlowMutationResult, GameFlowService};
use crate::domain::cheat::settle_cheat_phase;
use crate::domain::state::{GameId, GameState, Phase};
use crate::domain::turns::TurnOutcome;
use crate::domain::voting::{self, VoteOutcome};
use crate::error::AppError;

impl GameFlowService {
    /// Close the day's vote. Unless the hanging ended the game, night falls
    /// and NPC cheats and turns run until the human seat has to act.
    pub async fn end_day(
        &self,
        game_id: GameId,
    ) -> Result<GameFlowMutationResult<VoteOutcome>, AppError> {
        let mut session = self.open(game_id).await?;
        let outcome = self.with_rng(|rng| voting::finalize_vote(&mut session.state, rng))?;
        info!(
            %game_id,
            day = session.state.day,
            eliminated = ?outcome.eliminated,
            winners = ?outcome.winners,
            "vote finalized"
        );
        if session.state.phase == Phase::Play && !session.state.is_game_over() {
            self.begin_night(&mut session.state).await?;
        }
        self.commit(session, outcome).await
    }

    pub(super) async fn begin_night(&self, state: &mut GameState) -> Result<TurnOutcome, AppError> {
        let resolutions = self.process_npc_cheats(state).await?;
        let settled = settle_cheat_phase(state);
        debug!(
            game_id = %state.game_id,
            npc_cheats = resolutions.len(),
            settled,
            "night opened"
        );
        self.continue_night(state).await
    }

    /// Re-check the cheat gate, then let NPCs move.
    pub(super) async fn continue_night(&self, state: &mut GameState) -> Result<TurnOutcome, AppError> {
        if state.phase != Phase::Play || state.is_game_over() {
            return Ok(TurnOutcome::default());
        }
        settle_cheat_phase(state);
        let out = self.run_npc_turns(state).await?;
        if out.night_ended() {
            info!(game_id = %state.game_id, day = state.day, "night ended");
        }
        if let Some(winners) = out.winners() {
            info!(game_id = %state.game_id, ?winners, reason = ?state.victory_reason, "game over");
        }
        Ok(out)
    }
}
