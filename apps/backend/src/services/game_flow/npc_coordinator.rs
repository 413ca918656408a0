use std::collections::BTreeMap;

use futures::future::join_all;
use rand::Rng;
use tracing::{debug, info, warn};

use super::GameFlowService;
use crate::domain::cheat::{
    begin_cheat, correct_over_defense, park_pending, resolve_cheat, CheatAttempt, CheatResolution,
    CheatVerdict,
};
use crate::domain::deduction::deduce;
use crate::domain::discussion;
use crate::domain::state::{GameState, Phase, PlayerId, SocialClass};
use crate::domain::turns::{apply_pass, apply_play, reconcile_turn, TurnOutcome};
use crate::domain::voting;
use crate::domain::get_valid_plays;
use crate::error::AppError;
use crate::oracle::payloads::{
    CheatProposalRequest, DefenseRequest, JudgeCheatRequest, PlayRequest, SpeechRequest,
    VoteRequest, WarnRequest,
};
use crate::oracle::validate::{
    defense_from_reply, play_from_reply, proposal_from_reply, random_play, random_vote,
    speech_from_reply, verdict_from_reply, vote_from_reply, warning_from_reply, PlayDecision,
    DEFAULT_CHEAT_METHOD, DEFAULT_DEFENSE, DEFAULT_WARNING,
};

/// Upper bound on consecutive NPC turns in one service call.
const MAX_NPC_STEPS: usize = 1_000;
/// Chat lines handed to the oracle as context.
const RECENT_CHAT_LINES: usize = 12;

fn recent_discussion(state: &GameState) -> Vec<String> {
    let skip = state.chat.len().saturating_sub(RECENT_CHAT_LINES);
    state
        .chat
        .iter()
        .skip(skip)
        .map(|line| match &line.speaker {
            Some(id) => format!("{}: {}", state.name_of(id), line.text),
            None => line.text.clone(),
        })
        .collect()
}

fn hand_sizes(state: &GameState, except: &PlayerId) -> BTreeMap<PlayerId, usize> {
    state
        .players
        .iter()
        .filter(|p| p.is_alive() && &p.id != except)
        .map(|p| (p.id.clone(), p.hand.len()))
        .collect()
}

fn others_alive(state: &GameState, me: &PlayerId) -> Vec<PlayerId> {
    state.alive_ids().into_iter().filter(|id| id != me).collect()
}

fn live_npcs(state: &GameState) -> Vec<PlayerId> {
    state
        .players
        .iter()
        .filter(|p| !p.is_human && p.is_alive())
        .map(|p| p.id.clone())
        .collect()
}

impl GameFlowService {
    /// Play NPC turns until the turn reaches the human seat, the night ends,
    /// the game ends, or the night's cheat exchange is still open.
    pub(super) async fn run_npc_turns(&self, state: &mut GameState) -> Result<TurnOutcome, AppError> {
        let mut out = TurnOutcome::default();
        for _ in 0..MAX_NPC_STEPS {
            if state.is_game_over() || state.phase != Phase::Play || !state.cheat_phase_done {
                return Ok(out);
            }
            let Some(current) = state.current_turn.clone() else {
                return Ok(out);
            };
            let player = state.player(&current)?;
            if player.is_human {
                return Ok(out);
            }

            let valid_plays = get_valid_plays(&player.hand, &state.table.cards, state.table.reversed);
            let table_empty = state.table.cards.is_empty();
            let req = PlayRequest {
                player_id: current.clone(),
                hand: player.hand.clone(),
                table: state.table.cards.clone(),
                reversed: state.table.reversed,
                valid_plays,
                opponents_hand_sizes: hand_sizes(state, &current),
            };
            let decision = match self.ask("decide_play", self.oracle.decide_play(&req)).await {
                Some(reply) => {
                    self.with_rng(|rng| play_from_reply(&reply, &req.valid_plays, table_empty, rng))
                }
                None => self.with_rng(|rng| random_play(&req.valid_plays, table_empty, rng)),
            };

            let step = match &decision {
                PlayDecision::Play(cards) => apply_play(state, &current, cards),
                PlayDecision::Pass => apply_pass(state, &current),
            };
            let step = match step {
                Ok(step) => step,
                Err(err) => {
                    warn!(player = %current, error = %err, "validated NPC move rejected, passing");
                    apply_pass(state, &current)?
                }
            };
            debug!(player = %current, ?decision, "npc turn");
            out.events.extend(step.events);
        }
        warn!(game_id = %state.game_id, "NPC turn limit reached");
        Ok(out)
    }

    /// One speech line from every live NPC, requested concurrently and
    /// appended in seat order. Returns the number of lines posted.
    pub(super) async fn npc_speech_round(&self, state: &mut GameState) -> Result<usize, AppError> {
        if state.is_game_over() || state.phase != Phase::Discussion {
            return Ok(0);
        }
        let report = deduce(state);
        let recent = recent_discussion(state);
        let requests: Vec<SpeechRequest> = live_npcs(state)
            .into_iter()
            .filter_map(|id| {
                let player = state.player(&id).ok()?;
                let friends = others_alive(state, &id)
                    .into_iter()
                    .filter(|other| state.relationships.is_friend(&id, other))
                    .collect();
                Some(SpeechRequest {
                    speaker: id.clone(),
                    name: player.name.clone(),
                    backstory: player.backstory.clone(),
                    day: state.day,
                    recent_discussion: recent.clone(),
                    friends,
                    logic_templates: report.templates.clone(),
                })
            })
            .collect();

        let replies = join_all(
            requests
                .iter()
                .map(|req| self.ask("generate_speech", self.oracle.generate_speech(req))),
        )
        .await;

        let mut posted = 0;
        for (req, reply) in requests.iter().zip(replies) {
            let Some(text) = reply.as_ref().and_then(speech_from_reply) else {
                continue;
            };
            discussion::post_chat(state, &req.speaker, &text, self.settings.day_chat_max)?;
            posted += 1;
        }
        debug!(game_id = %state.game_id, posted, "npc speech round");
        Ok(posted)
    }

    /// Ballots from every live NPC that has not voted today.
    pub(super) async fn npc_votes(
        &self,
        state: &mut GameState,
    ) -> Result<Vec<(PlayerId, PlayerId)>, AppError> {
        if state.is_game_over() || state.phase != Phase::Discussion {
            return Ok(Vec::new());
        }
        let summaries = deduce(state).summaries;
        let recent = recent_discussion(state);
        let requests: Vec<VoteRequest> = live_npcs(state)
            .into_iter()
            .filter(|id| !state.votes.contains_key(id))
            .map(|voter| VoteRequest {
                candidates: others_alive(state, &voter),
                voter,
                recent_discussion: recent.clone(),
                logic_summaries: summaries.clone(),
            })
            .collect();

        let replies = join_all(
            requests
                .iter()
                .map(|req| self.ask("decide_vote", self.oracle.decide_vote(req))),
        )
        .await;

        let mut cast = Vec::new();
        for (req, reply) in requests.iter().zip(replies) {
            let target = self.with_rng(|rng| match &reply {
                Some(reply) => vote_from_reply(reply, &req.candidates, rng),
                None => random_vote(&req.candidates, rng),
            });
            let Some(target) = target else {
                continue;
            };
            voting::cast_vote(state, &req.voter, &target)?;
            cast.push((req.voter.clone(), target));
        }
        Ok(cast)
    }

    /// Eligible NPCs decide whether to cheat. Attempts on NPCs resolve at
    /// once; an attempt on the human seat is parked with a warning.
    pub(super) async fn process_npc_cheats(
        &self,
        state: &mut GameState,
    ) -> Result<Vec<CheatResolution>, AppError> {
        let requests: Vec<CheatProposalRequest> = state
            .players
            .iter()
            .filter(|p| {
                !p.is_human && p.is_alive() && p.class == SocialClass::Lower && !p.cheat_used
            })
            .map(|p| CheatProposalRequest {
                attacker: p.id.clone(),
                candidates: others_alive(state, &p.id),
                environment: state.environment.clone(),
                hand_sizes: hand_sizes(state, &p.id),
            })
            .collect();

        let replies = join_all(
            requests
                .iter()
                .map(|req| self.ask("propose_cheat", self.oracle.propose_cheat(req))),
        )
        .await;

        let mut resolutions = Vec::new();
        for (req, reply) in requests.iter().zip(replies) {
            if state.is_game_over() || state.phase != Phase::Play {
                break;
            }
            let choice = match reply {
                Some(reply) => proposal_from_reply(&reply, &req.candidates),
                None => self.fallback_cheat(&req.candidates),
            };
            let Some((target, method)) = choice else {
                continue;
            };
            if state.player(&target)?.is_human && state.pending_cheat.is_some() {
                debug!(attacker = %req.attacker, "human already targeted tonight, skipping");
                continue;
            }
            let attempt = match begin_cheat(state, &req.attacker, &target, method) {
                Ok(attempt) => attempt,
                Err(err) => {
                    warn!(attacker = %req.attacker, target = %target, error = %err, "npc cheat rejected");
                    continue;
                }
            };

            if let Some(resolution) = self.dispatch_attempt(state, attempt).await? {
                resolutions.push(resolution);
            }
        }
        Ok(resolutions)
    }

    /// Park an attempt on the human seat behind a warning, or resolve an
    /// attempt on an NPC against an oracle-written defense.
    pub(super) async fn dispatch_attempt(
        &self,
        state: &mut GameState,
        attempt: CheatAttempt,
    ) -> Result<Option<CheatResolution>, AppError> {
        if state.player(&attempt.target)?.is_human {
            let warn_req = WarnRequest {
                method: attempt.method.clone(),
                environment: state.environment.clone(),
            };
            let warning = self
                .ask("warn_target", self.oracle.warn_target(&warn_req))
                .await
                .map(|reply| warning_from_reply(&reply))
                .unwrap_or_else(|| DEFAULT_WARNING.to_owned());
            info!(game_id = %state.game_id, target = %attempt.target, "cheat parked for the human seat");
            park_pending(state, attempt, warning)?;
            return Ok(None);
        }

        let defense_req = DefenseRequest {
            defender: attempt.target.clone(),
            warning: DEFAULT_WARNING.to_owned(),
            environment: state.environment.clone(),
        };
        let (defense, category) = self
            .ask("propose_defense", self.oracle.propose_defense(&defense_req))
            .await
            .map(defense_from_reply)
            .unwrap_or_else(|| (DEFAULT_DEFENSE.to_owned(), None));
        self.adjudicate(state, &attempt, &defense, category)
            .await
            .map(Some)
    }

    fn fallback_cheat(&self, candidates: &[PlayerId]) -> Option<(PlayerId, String)> {
        let rate = f64::from(self.settings.npc_cheat_rate.min(100)) / 100.0;
        self.with_rng(|rng| {
            if candidates.is_empty() || !rng.random_bool(rate) {
                return None;
            }
            let target = candidates[rng.random_range(0..candidates.len())].clone();
            Some((target, DEFAULT_CHEAT_METHOD.to_owned()))
        })
    }

    /// Judge an attempt against a defense and apply the result.
    pub(super) async fn adjudicate(
        &self,
        state: &mut GameState,
        attempt: &CheatAttempt,
        defense: &str,
        category: Option<String>,
    ) -> Result<CheatResolution, AppError> {
        let req = JudgeCheatRequest {
            attacker_method: attempt.method.clone(),
            defense_text: defense.to_owned(),
            environment: state.environment.clone(),
            defense_category: category,
        };
        let verdict = self
            .ask("judge_cheat", self.oracle.judge_cheat(&req))
            .await
            .map(verdict_from_reply)
            .unwrap_or_else(CheatVerdict::fallback);
        let verdict = correct_over_defense(verdict, defense);

        let resolution = resolve_cheat(state, attempt, defense, verdict)?;
        info!(
            game_id = %state.game_id,
            judgment = ?resolution.entry.judgment,
            effect = ?resolution.entry.effect,
            exposed = resolution.exposed_attacker.is_some(),
            "cheat resolved"
        );
        reconcile_turn(state)?;
        Ok(resolution)
    }
}
