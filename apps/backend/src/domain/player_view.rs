//! What one viewer may see of a game.
//!
//! Hidden fields are `None` and serialize as `null`, never omitted, so the
//! payload shape is identical for every viewer. A player's hand and class are
//! visible to themselves, to everyone once they are eliminated, and to
//! everyone in reveal-all mode. A forced hand reveal exposes the hand only.

use serde::{Deserialize, Serialize};

use super::cards_logic::get_valid_plays;
use super::cheat::{CheatEffect, CheatJudgment, DefenderPenalty};
use super::state::{
    GameRole, GameState, HiddenWinCondition, Investigation, Phase, Player, PlayerId, SocialClass,
    WinCondition,
};
use crate::domain::Card;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub eliminated: bool,
    pub finished: bool,
    pub hand_count: usize,
    pub hand: Option<Vec<Card>>,
    pub class: Option<SocialClass>,
    pub role: Option<GameRole>,
    pub win_condition: Option<WinCondition>,
    pub hidden_condition: Option<HiddenWinCondition>,
    pub backstory: Option<String>,
    pub hand_revealed: bool,
    pub skip_next_turn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatLogView {
    /// Known only on exposure, to the attacker, or in reveal-all mode.
    pub attacker: Option<PlayerId>,
    pub target: PlayerId,
    pub judgment: CheatJudgment,
    pub effect: CheatEffect,
    pub defender_penalty: Option<DefenderPenalty>,
    pub narrative: String,
    pub day: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheatView {
    pub warning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub cards: Vec<Card>,
    pub leader: Option<PlayerId>,
    pub consecutive_passes: usize,
    pub clear_count: u8,
    pub reversed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub speaker: Option<PlayerId>,
    pub text: String,
    pub day: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub viewer: Option<PlayerId>,
    pub phase: Phase,
    pub day: u16,
    pub players: Vec<PlayerView>,
    pub table: TableView,
    pub discard_count: usize,
    pub current_turn: Option<PlayerId>,
    pub turn_order: Vec<PlayerId>,
    pub finish_order: Vec<PlayerId>,
    pub votes: Vec<(PlayerId, PlayerId)>,
    pub eliminated_today: Option<PlayerId>,
    pub winner_ids: Vec<PlayerId>,
    pub victory_reason: Option<String>,
    pub environment: String,
    pub chat: Vec<ChatLine>,
    pub cheat_log: Vec<CheatLogView>,
    /// Only for the targeted defender.
    pub pending_cheat: Option<PendingCheatView>,
    /// Only for the investigator.
    pub investigation: Option<Investigation>,
    /// Legal combinations for the viewer when it is their turn.
    pub legal_plays: Option<Vec<Vec<Card>>>,
    pub reveal_all: bool,
}

fn player_view(state: &GameState, p: &Player, viewer: Option<&PlayerId>, reveal_all: bool) -> PlayerView {
    let is_self = viewer == Some(&p.id);
    let open = is_self || p.eliminated || reveal_all;
    let private = is_self || reveal_all;
    PlayerView {
        id: p.id.clone(),
        name: p.name.clone(),
        is_human: p.is_human,
        eliminated: p.eliminated,
        finished: state.has_finished(&p.id),
        hand_count: p.hand.len(),
        hand: (open || p.hand_revealed).then(|| p.hand.clone()),
        class: open.then_some(p.class),
        role: private.then_some(p.role),
        win_condition: open.then(|| p.win_condition.clone()),
        hidden_condition: private.then(|| p.hidden_condition.clone()),
        backstory: private.then(|| p.backstory.clone()),
        hand_revealed: p.hand_revealed,
        skip_next_turn: p.skip_next_turn,
    }
}

/// Build the view for `viewer` (`None` for a spectator).
pub fn game_view(state: &GameState, viewer: Option<&PlayerId>, reveal_all: bool) -> GameView {
    let players = state
        .players
        .iter()
        .map(|p| player_view(state, p, viewer, reveal_all))
        .collect();

    let cheat_log = state
        .cheat_log
        .iter()
        .map(|e| {
            let known = reveal_all
                || e.judgment == CheatJudgment::BigFail
                || viewer == Some(&e.attacker);
            CheatLogView {
                attacker: known.then(|| e.attacker.clone()),
                target: e.target.clone(),
                judgment: e.judgment,
                effect: e.effect,
                defender_penalty: e.defender_penalty,
                narrative: e.narrative.clone(),
                day: e.day,
            }
        })
        .collect();

    let pending_cheat = state
        .pending_cheat
        .as_ref()
        .filter(|p| reveal_all || viewer == Some(&p.attempt.target))
        .map(|p| PendingCheatView {
            warning: p.warning.clone(),
        });

    let investigation = state
        .investigation
        .as_ref()
        .filter(|i| reveal_all || viewer == Some(&i.investigator))
        .cloned();

    let legal_plays = viewer
        .filter(|v| state.phase == Phase::Play && state.current_turn.as_ref() == Some(*v))
        .and_then(|v| state.player(v).ok())
        .map(|p| get_valid_plays(&p.hand, &state.table.cards, state.table.reversed));

    GameView {
        viewer: viewer.cloned(),
        phase: state.phase,
        day: state.day,
        players,
        table: TableView {
            cards: state.table.cards.clone(),
            leader: state.table.leader.clone(),
            consecutive_passes: state.table.consecutive_passes,
            clear_count: state.table.clear_count,
            reversed: state.table.reversed,
        },
        discard_count: state.discard.len(),
        current_turn: state.current_turn.clone(),
        turn_order: state.turn_order.clone(),
        finish_order: state.finish_order.clone(),
        votes: state
            .votes
            .iter()
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect(),
        eliminated_today: state.eliminated_today.clone(),
        winner_ids: state.winner_ids.clone(),
        victory_reason: state.victory_reason.clone(),
        environment: state.environment.clone(),
        chat: state
            .chat
            .iter()
            .map(|m| ChatLine {
                speaker: m.speaker.clone(),
                text: m.text.clone(),
                day: m.day,
            })
            .collect(),
        cheat_log,
        pending_cheat,
        investigation,
        legal_plays,
        reveal_all,
    }
}
