//! Night turn machine: plays, passes, table clears and turn advancement.

use serde::{Deserialize, Serialize};

use super::cards_logic::{can_play, hand_contains_all, is_cut, PlayShape};
use super::phases::transition_to_discussion;
use super::rules::NIGHT_CLEAR_LIMIT;
use super::state::{
    require_alive, require_card_conservation, require_not_over, require_phase,
    require_turn_pointer, GameState, Phase, PlayerId,
};
use super::victory::{check_instant_victories, check_victory};
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

/// Something observable that happened while applying a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TurnEvent {
    Played { player: PlayerId, cards: Vec<Card>, shape: PlayShape },
    Passed { player: PlayerId },
    Revolution { reversed: bool },
    Cut { player: PlayerId },
    TableCleared { clear_count: u8 },
    Finished { player: PlayerId },
    TurnSkipped { player: PlayerId },
    NightEnded,
    Victory { winners: Vec<PlayerId> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub events: Vec<TurnEvent>,
}

impl TurnOutcome {
    pub fn table_cleared(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, TurnEvent::TableCleared { .. }))
    }

    pub fn night_ended(&self) -> bool {
        self.events.contains(&TurnEvent::NightEnded)
    }

    pub fn winners(&self) -> Option<&[PlayerId]> {
        self.events.iter().find_map(|e| match e {
            TurnEvent::Victory { winners } => Some(winners.as_slice()),
            _ => None,
        })
    }
}

fn require_turn(state: &GameState, who: &PlayerId) -> Result<(), DomainError> {
    if state.current_turn.as_ref() != Some(who) {
        return Err(DomainError::validation(
            ValidationKind::OutOfTurn,
            format!("It is not {who}'s turn"),
        ));
    }
    Ok(())
}

fn require_can_act(state: &GameState, who: &PlayerId) -> Result<(), DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Play)?;
    require_alive(state, who)?;
    require_turn(state, who)
}

/// Place `cards` from `who`'s hand onto the table.
pub fn apply_play(
    state: &mut GameState,
    who: &PlayerId,
    cards: &[Card],
) -> Result<TurnOutcome, DomainError> {
    require_can_act(state, who)?;
    if !hand_contains_all(&state.player(who)?.hand, cards) {
        return Err(DomainError::validation(
            ValidationKind::CardNotInHand,
            "Selected cards are not all in hand",
        ));
    }
    let shape = can_play(cards, &state.table.cards, state.table.reversed)?;

    let mut out = TurnOutcome::default();
    let player = state.player_mut(who)?;
    for card in cards {
        if let Some(pos) = player.hand.iter().position(|c| c == card) {
            player.hand.remove(pos);
        }
    }
    player.played.extend_from_slice(cards);
    let finished = player.hand.is_empty();
    out.events.push(TurnEvent::Played {
        player: who.clone(),
        cards: cards.to_vec(),
        shape,
    });

    let beaten = std::mem::take(&mut state.table.cards);
    state.discard.extend(beaten);

    let revolution = shape == PlayShape::Quad;
    let cut = is_cut(cards);
    if revolution {
        state.table.reversed = !state.table.reversed;
        out.events.push(TurnEvent::Revolution {
            reversed: state.table.reversed,
        });
    }
    if revolution || cut {
        if cut {
            out.events.push(TurnEvent::Cut { player: who.clone() });
        }
        state.discard.extend_from_slice(cards);
        clear_table(state, &mut out);
    } else {
        state.table.cards = cards.to_vec();
        state.table.leader = Some(who.clone());
        state.table.consecutive_passes = 0;
    }

    if finished {
        state.finish_order.push(who.clone());
        out.events.push(TurnEvent::Finished { player: who.clone() });
    }
    if revolution || finished {
        let winners = check_instant_victories(state);
        if !winners.is_empty() {
            out.events.push(TurnEvent::Victory { winners });
        }
    }

    finish_turn(state, &mut out)?;
    Ok(out)
}

/// Pass. The table clears once every active player except its leader has passed.
pub fn apply_pass(state: &mut GameState, who: &PlayerId) -> Result<TurnOutcome, DomainError> {
    require_can_act(state, who)?;
    let mut out = TurnOutcome::default();
    state.table.consecutive_passes += 1;
    out.events.push(TurnEvent::Passed { player: who.clone() });

    if state.table.consecutive_passes >= pass_threshold(state) {
        let leftover = std::mem::take(&mut state.table.cards);
        state.discard.extend(leftover);
        clear_table(state, &mut out);
    }

    finish_turn(state, &mut out)?;
    Ok(out)
}

/// Passes needed to clear: active players other than the current leader.
pub fn pass_threshold(state: &GameState) -> usize {
    let active = state.active_ids();
    let leader_active = state
        .table
        .leader
        .as_ref()
        .is_some_and(|l| active.contains(l));
    (active.len() - usize::from(leader_active)).max(1)
}

// Table cards must already be moved to the discard pile.
fn clear_table(state: &mut GameState, out: &mut TurnOutcome) {
    state.table.leader = None;
    state.table.consecutive_passes = 0;
    state.table.clear_count += 1;
    out.events.push(TurnEvent::TableCleared {
        clear_count: state.table.clear_count,
    });
}

fn finish_turn(state: &mut GameState, out: &mut TurnOutcome) -> Result<(), DomainError> {
    if !state.is_game_over() {
        advance_turn(state, out)?;
        check_night_end(state, out);
    }
    require_card_conservation(state)?;
    require_turn_pointer(state)
}

/// Move the pointer to the next active seat, consuming skip flags on the way.
pub fn advance_turn(state: &mut GameState, out: &mut TurnOutcome) -> Result<(), DomainError> {
    let current = state
        .current_turn
        .clone()
        .ok_or_else(|| DomainError::invariant("no turn pointer during play"))?;
    let order = state.turn_order.clone();
    let start = order
        .iter()
        .position(|id| id == &current)
        .ok_or_else(|| DomainError::invariant(format!("turn pointer {current} not in turn order")))?;
    let active = state.active_ids();
    if active.is_empty() {
        state.current_turn = None;
        return Ok(());
    }

    // Two laps: the first may only consume skip flags.
    let n = order.len();
    for step in 1..=2 * n {
        let candidate = &order[(start + step) % n];
        if !active.contains(candidate) {
            continue;
        }
        let player = state.player_mut(candidate)?;
        if player.skip_next_turn {
            player.skip_next_turn = false;
            out.events.push(TurnEvent::TurnSkipped {
                player: candidate.clone(),
            });
            continue;
        }
        state.current_turn = Some(candidate.clone());
        return Ok(());
    }
    state.current_turn = active.first().cloned();
    Ok(())
}

/// End the night when one active player remains or the clear limit is reached.
pub fn check_night_end(state: &mut GameState, out: &mut TurnOutcome) {
    if state.phase != Phase::Play || state.is_game_over() {
        return;
    }
    let few_left = state.active_ids().len() <= 1;
    if !few_left && state.table.clear_count < NIGHT_CLEAR_LIMIT {
        return;
    }
    out.events.push(TurnEvent::NightEnded);
    let winners = check_victory(state);
    if !winners.is_empty() {
        out.events.push(TurnEvent::Victory { winners });
        return;
    }
    transition_to_discussion(state);
}

/// After an out-of-turn change to hands (a cheat): check instant goals, move
/// the pointer off a player who just emptied their hand, and end the night if
/// that left too few players.
pub fn reconcile_turn(state: &mut GameState) -> Result<TurnOutcome, DomainError> {
    let mut out = TurnOutcome::default();
    let winners = check_instant_victories(state);
    if !winners.is_empty() {
        out.events.push(TurnEvent::Victory { winners });
        return Ok(out);
    }
    if state.phase != Phase::Play {
        return Ok(out);
    }
    let stale = state
        .current_turn
        .as_ref()
        .is_some_and(|id| !state.is_active(id));
    if stale && !state.active_ids().is_empty() {
        advance_turn(state, &mut out)?;
    }
    check_night_end(state, &mut out);
    require_card_conservation(state)?;
    require_turn_pointer(state)?;
    Ok(out)
}
