//! Append-only log of observable events feeding the deduction engine.

use serde::{Deserialize, Serialize};

use super::cards_logic::card_strength;
use super::rules::STRONG_CARD_STRENGTH;
use super::state::{GameRole, GameState, PlayerId, SocialClass};
use crate::domain::Card;

/// A self-declaration made in discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Claim {
    Class(SocialClass),
    Role(GameRole),
}

impl Claim {
    fn key(&self) -> String {
        match self {
            Claim::Class(c) => format!("class:{c:?}"),
            Claim::Role(r) => format!("role:{r:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    RoleClaim,
    StrongCardPlay,
    CheatExposed,
    Investigation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactPayload {
    RoleClaim { claim: Claim },
    StrongCardPlay { card: Card },
    CheatExposed { target: PlayerId },
    Investigation { subject: PlayerId, finding: SocialClass },
}

impl FactPayload {
    pub fn kind(&self) -> FactKind {
        match self {
            FactPayload::RoleClaim { .. } => FactKind::RoleClaim,
            FactPayload::StrongCardPlay { .. } => FactKind::StrongCardPlay,
            FactPayload::CheatExposed { .. } => FactKind::CheatExposed,
            FactPayload::Investigation { .. } => FactKind::Investigation,
        }
    }

    // Dedup key within (actor, kind, round).
    fn key(&self) -> String {
        match self {
            FactPayload::RoleClaim { claim } => claim.key(),
            FactPayload::StrongCardPlay { card } => card.to_string(),
            FactPayload::CheatExposed { target } => target.to_string(),
            FactPayload::Investigation { subject, .. } => subject.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub actor: PlayerId,
    pub round: u16,
    pub payload: FactPayload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactLog {
    entries: Vec<Fact>,
}

impl FactLog {
    /// Append unless an entry with the same (actor, kind, key, round) exists.
    /// Returns whether the fact was recorded.
    pub fn record(&mut self, actor: PlayerId, round: u16, payload: FactPayload) -> bool {
        let kind = payload.kind();
        let key = payload.key();
        let duplicate = self.entries.iter().any(|f| {
            f.actor == actor && f.round == round && f.payload.kind() == kind && f.payload.key() == key
        });
        if duplicate {
            return false;
        }
        self.entries.push(Fact {
            actor,
            round,
            payload,
        });
        true
    }

    pub fn entries(&self) -> &[Fact] {
        &self.entries
    }

    pub fn of_kind(&self, kind: FactKind) -> impl Iterator<Item = &Fact> {
        self.entries.iter().filter(move |f| f.payload.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn is_strong_card(card: Card) -> bool {
    card.is_joker() || card_strength(card, false) >= STRONG_CARD_STRENGTH
}

/// Log each player's strongest strong card not already logged for them on an
/// earlier dawn. `Player::played` spans every night, so earlier cards are skipped.
pub fn log_strong_card_plays(state: &mut GameState) -> usize {
    let round = state.day;
    let facts = &state.facts;
    let best: Vec<(PlayerId, Card)> = state
        .players
        .iter()
        .filter_map(|p| {
            p.played
                .iter()
                .copied()
                .filter(|c| is_strong_card(*c))
                .filter(|c| !already_logged(facts, &p.id, *c))
                .max_by_key(|c| card_strength(*c, false))
                .map(|c| (p.id.clone(), c))
        })
        .collect();
    best.into_iter()
        .filter(|(actor, card)| {
            state
                .facts
                .record(actor.clone(), round, FactPayload::StrongCardPlay { card: *card })
        })
        .count()
}

fn already_logged(facts: &FactLog, actor: &PlayerId, card: Card) -> bool {
    facts.of_kind(FactKind::StrongCardPlay).any(|f| {
        &f.actor == actor && matches!(f.payload, FactPayload::StrongCardPlay { card: c } if c == card)
    })
}

pub fn record_claim(state: &mut GameState, actor: &PlayerId, claim: Claim) -> bool {
    let round = state.day;
    state
        .facts
        .record(actor.clone(), round, FactPayload::RoleClaim { claim })
}
