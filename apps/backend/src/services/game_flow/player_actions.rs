use tracing::{debug, info};

use super::{GameFlowMutationResult, GameFlowService};
use crate::domain::cheat::{begin_cheat, complete_cheat_phase, take_pending, CheatResolution};
use crate::domain::deduction::{deduce, DeductionReport};
use crate::domain::facts::Claim;
use crate::domain::investigation;
use crate::domain::player_view::{game_view, GameView};
use crate::domain::state::{GameId, GameState, Investigation, PlayerId};
use crate::domain::turns::{apply_pass, apply_play, TurnOutcome};
use crate::domain::{discussion, new_game, voting, Card, GameSetup};
use crate::error::AppError;
use crate::services::game_store::require_game;

impl GameFlowService {
    /// Deal a new game and store it. The game opens on day 1 in discussion.
    pub async fn create_game(&self, setup: &GameSetup) -> Result<GameState, AppError> {
        let state = new_game(setup)?;
        info!(
            game_id = %state.game_id,
            players = state.players.len(),
            human = state.human().is_some(),
            "game created"
        );
        self.store.put(state.clone()).await?;
        Ok(state)
    }

    pub async fn delete_game(&self, game_id: GameId) -> Result<bool, AppError> {
        let session = self.open(game_id).await?;
        let removed = self.store.delete(game_id).await?;
        drop(session);
        self.forget_lock(game_id);
        info!(%game_id, removed, "game deleted");
        Ok(removed)
    }

    /// What `viewer` may see; `None` is a spectator.
    pub async fn view(&self, game_id: GameId, viewer: Option<&PlayerId>) -> Result<GameView, AppError> {
        let state = require_game(self.store.as_ref(), game_id).await?;
        Ok(game_view(&state, viewer, self.settings.reveal_all))
    }

    /// Current deduction summaries, tactics and message templates.
    pub async fn logic_state(&self, game_id: GameId) -> Result<DeductionReport, AppError> {
        let state = require_game(self.store.as_ref(), game_id).await?;
        Ok(deduce(&state))
    }

    /// Post a chat line. A line from the human seat prompts a speech round
    /// from every live NPC.
    pub async fn post_chat(
        &self,
        game_id: GameId,
        speaker: &PlayerId,
        text: &str,
    ) -> Result<GameFlowMutationResult<Option<Claim>>, AppError> {
        let mut session = self.open(game_id).await?;
        let claim = discussion::post_chat(&mut session.state, speaker, text, self.settings.day_chat_max)?;
        debug!(%game_id, %speaker, ?claim, "chat posted");
        if session.state.player(speaker)?.is_human {
            self.npc_speech_round(&mut session.state).await?;
        }
        self.commit(session, claim).await
    }

    /// Ask every live NPC for one line of discussion.
    pub async fn run_discussion(&self, game_id: GameId) -> Result<GameFlowMutationResult<usize>, AppError> {
        let mut session = self.open(game_id).await?;
        let posted = self.npc_speech_round(&mut session.state).await?;
        self.commit(session, posted).await
    }

    /// Returns false when the same claim was already made today.
    pub async fn declare_claim(
        &self,
        game_id: GameId,
        actor: &PlayerId,
        claim: Claim,
    ) -> Result<GameFlowMutationResult<bool>, AppError> {
        let mut session = self.open(game_id).await?;
        let recorded = discussion::declare_claim(&mut session.state, actor, claim)?;
        debug!(%game_id, %actor, ?claim, recorded, "claim declared");
        self.commit(session, recorded).await
    }

    pub async fn cast_vote(
        &self,
        game_id: GameId,
        voter: &PlayerId,
        target: &PlayerId,
    ) -> Result<GameFlowMutationResult, AppError> {
        let mut session = self.open(game_id).await?;
        voting::cast_vote(&mut session.state, voter, target)?;
        debug!(%game_id, %voter, %target, "vote cast");
        self.commit(session, ()).await
    }

    /// Ballots for every NPC that has not voted yet, as (voter, target).
    pub async fn collect_npc_votes(
        &self,
        game_id: GameId,
    ) -> Result<GameFlowMutationResult<Vec<(PlayerId, PlayerId)>>, AppError> {
        let mut session = self.open(game_id).await?;
        let cast = self.npc_votes(&mut session.state).await?;
        debug!(%game_id, votes = cast.len(), "npc votes collected");
        self.commit(session, cast).await
    }

    /// Play cards, then let NPCs take their turns. The outcome carries the
    /// events of the human move followed by those of the NPC moves.
    pub async fn play_cards(
        &self,
        game_id: GameId,
        player: &PlayerId,
        cards: &[Card],
    ) -> Result<GameFlowMutationResult<TurnOutcome>, AppError> {
        let mut session = self.open(game_id).await?;
        let mut out = apply_play(&mut session.state, player, cards)?;
        debug!(%game_id, %player, ?cards, "cards played");
        let npc = self.continue_night(&mut session.state).await?;
        out.events.extend(npc.events);
        self.commit(session, out).await
    }

    pub async fn pass_turn(
        &self,
        game_id: GameId,
        player: &PlayerId,
    ) -> Result<GameFlowMutationResult<TurnOutcome>, AppError> {
        let mut session = self.open(game_id).await?;
        let mut out = apply_pass(&mut session.state, player)?;
        debug!(%game_id, %player, "turn passed");
        let npc = self.continue_night(&mut session.state).await?;
        out.events.extend(npc.events);
        self.commit(session, out).await
    }

    /// The attacker spends tonight's cheat. An NPC target defends through the
    /// oracle and the attempt resolves at once.
    pub async fn initiate_cheat(
        &self,
        game_id: GameId,
        attacker: &PlayerId,
        target: &PlayerId,
        method: &str,
    ) -> Result<GameFlowMutationResult<Option<CheatResolution>>, AppError> {
        let mut session = self.open(game_id).await?;
        let attempt = begin_cheat(&mut session.state, attacker, target, method)?;
        debug!(%game_id, %attacker, %target, "cheat initiated");
        let resolution = self.dispatch_attempt(&mut session.state, attempt).await?;
        self.continue_night(&mut session.state).await?;
        self.commit(session, resolution).await
    }

    /// Answer the cheat pending against `defender`.
    pub async fn defend_cheat(
        &self,
        game_id: GameId,
        defender: &PlayerId,
        defense: &str,
        category: Option<String>,
    ) -> Result<GameFlowMutationResult<CheatResolution>, AppError> {
        let mut session = self.open(game_id).await?;
        let pending = take_pending(&mut session.state, defender)?;
        debug!(%game_id, %defender, "defense submitted");
        let resolution = self
            .adjudicate(&mut session.state, &pending.attempt, defense, category)
            .await?;
        self.continue_night(&mut session.state).await?;
        self.commit(session, resolution).await
    }

    /// The human seat declines tonight's cheat; NPC turns may proceed.
    pub async fn skip_cheat(
        &self,
        game_id: GameId,
        player: &PlayerId,
    ) -> Result<GameFlowMutationResult<TurnOutcome>, AppError> {
        let mut session = self.open(game_id).await?;
        complete_cheat_phase(&mut session.state, player)?;
        let out = self.continue_night(&mut session.state).await?;
        self.commit(session, out).await
    }

    pub async fn investigate(
        &self,
        game_id: GameId,
        investigator: &PlayerId,
        subject: &PlayerId,
    ) -> Result<GameFlowMutationResult<Investigation>, AppError> {
        let mut session = self.open(game_id).await?;
        let result = investigation::investigate(&mut session.state, investigator, subject)?;
        info!(%game_id, %investigator, "investigation used");
        self.commit(session, result).await
    }

    pub async fn game_ids(&self) -> Result<Vec<GameId>, AppError> {
        self.store.ids().await
    }
}
