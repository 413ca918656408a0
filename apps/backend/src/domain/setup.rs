//! Building a fresh game from a roster.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::dealing::{deal_hands, SplitMix64};
use super::facts::FactLog;
use super::relationships::{RelationshipLedger, ScoreLedger};
use super::rules::{lower_class_count, PLAYER_COUNT};
use super::seed_derivation::{derive_dealing_seed, derive_role_seed};
use super::state::{
    DeclaredRelationship, GameId, GameRole, GameState, HiddenWinCondition, Phase, Player,
    PlayerId, SocialClass, TableState, WinCondition,
};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSpec {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub is_human: bool,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub relationships: Vec<DeclaredRelationship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSetup {
    pub seats: Vec<SeatSpec>,
    pub seed: u64,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidSetup, detail)
}

fn validate(setup: &GameSetup) -> Result<(), DomainError> {
    let n = setup.seats.len();
    if !PLAYER_COUNT.contains(&n) {
        return Err(invalid(format!(
            "Need {}..={} players, got {n}",
            PLAYER_COUNT.start(),
            PLAYER_COUNT.end()
        )));
    }
    let unique: BTreeSet<&PlayerId> = setup.seats.iter().map(|s| &s.id).collect();
    if unique.len() != n {
        return Err(invalid("Player ids must be unique"));
    }
    if setup.seats.iter().filter(|s| s.is_human).count() > 1 {
        return Err(invalid("At most one human seat is supported"));
    }
    Ok(())
}

/// Classes by seat index: one upper, a third lower, the rest middle.
fn assign_classes(n: usize, rng: &mut SplitMix64) -> Vec<SocialClass> {
    let mut seats: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut seats);
    let lower = lower_class_count(n);
    let mut classes = vec![SocialClass::Middle; n];
    classes[seats[0]] = SocialClass::Upper;
    for &seat in seats.iter().skip(1).take(lower) {
        classes[seat] = SocialClass::Lower;
    }
    classes
}

fn pick_other(ids: &[PlayerId], me: usize, rng: &mut SplitMix64) -> PlayerId {
    let others: Vec<&PlayerId> = ids
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != me)
        .map(|(_, id)| id)
        .collect();
    others[rng.below(others.len())].clone()
}

fn hidden_condition(ids: &[PlayerId], me: usize, rng: &mut SplitMix64) -> HiddenWinCondition {
    match rng.below(6) {
        0 => HiddenWinCondition::RevengeOn {
            target: pick_other(ids, me, rng),
        },
        1 => HiddenWinCondition::Protect {
            target: pick_other(ids, me, rng),
        },
        2 => HiddenWinCondition::FirstOut,
        3 => HiddenWinCondition::Martyr,
        _ => HiddenWinCondition::Survive,
    }
}

/// Deal, assign classes, roles and goals, and seed every ledger.
/// The game opens on day 1 in discussion.
pub fn new_game(setup: &GameSetup) -> Result<GameState, DomainError> {
    validate(setup)?;
    let n = setup.seats.len();
    let ids: Vec<PlayerId> = setup.seats.iter().map(|s| s.id.clone()).collect();

    let mut rng = SplitMix64::new(derive_role_seed(setup.seed));
    let classes = assign_classes(n, &mut rng);
    let upper = classes
        .iter()
        .position(|c| *c == SocialClass::Upper)
        .map(|i| ids[i].clone())
        .ok_or_else(|| DomainError::invariant("no upper-tier seat assigned"))?;
    let first_lower = classes
        .iter()
        .position(|c| *c == SocialClass::Lower)
        .map(|i| ids[i].clone())
        .ok_or_else(|| DomainError::invariant("no lower-tier seat assigned"))?;

    let mut roles = vec![GameRole::None; n];
    let middles: Vec<usize> = (0..n).filter(|i| classes[*i] == SocialClass::Middle).collect();
    if let Some(&first) = middles.first() {
        roles[first] = GameRole::Detective;
    }
    if let Some(&second) = middles.get(1) {
        roles[second] = GameRole::Accomplice;
    }

    let hands = deal_hands(n, derive_dealing_seed(setup.seed));
    let mut players = Vec::with_capacity(n);
    let mut middle_index = 0usize;
    for (i, (seat, hand)) in setup.seats.iter().zip(hands).enumerate() {
        let win_condition = match classes[i] {
            SocialClass::Upper => WinCondition::FinishFirst,
            SocialClass::Lower => WinCondition::TriggerReversal,
            SocialClass::Middle => {
                middle_index += 1;
                if middle_index % 2 == 1 {
                    WinCondition::OutRank {
                        target: upper.clone(),
                    }
                } else {
                    WinCondition::Help {
                        target: first_lower.clone(),
                    }
                }
            }
        };
        players.push(Player {
            id: seat.id.clone(),
            name: seat.name.clone(),
            is_human: seat.is_human,
            class: classes[i],
            role: roles[i],
            win_condition,
            hidden_condition: hidden_condition(&ids, i, &mut rng),
            backstory: seat.backstory.clone(),
            relationships: seat.relationships.clone(),
            hand,
            played: Vec::new(),
            eliminated: false,
            skip_next_turn: false,
            cheat_used: false,
            hand_revealed: false,
        });
    }

    let declared: Vec<(&PlayerId, &PlayerId, &str)> = setup
        .seats
        .iter()
        .flat_map(|s| {
            s.relationships
                .iter()
                .map(move |r| (&s.id, &r.target, r.description.as_str()))
        })
        .collect();

    Ok(GameState {
        game_id: GameId::new(),
        phase: Phase::Discussion,
        day: 1,
        relationships: RelationshipLedger::seed(&ids, declared),
        trust: ScoreLedger::seed(&ids),
        affinity: ScoreLedger::seed(&ids),
        turn_order: ids,
        players,
        table: TableState::default(),
        discard: Vec::new(),
        current_turn: None,
        finish_order: Vec::new(),
        votes: BTreeMap::new(),
        eliminated_today: None,
        winner_ids: Vec::new(),
        victory_reason: None,
        facts: FactLog::default(),
        cheat_log: Vec::new(),
        pending_cheat: None,
        cheat_phase_done: false,
        investigation: None,
        chat: Vec::new(),
        human_chat_today: 0,
        environment: String::new(),
    })
}
