//! Disguised actions ("cheats") by lower-tier players during the night.
//!
//! The oracle judges each attempt; everything here treats its verdict as
//! untrusted and re-normalises it before any state changes.

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};

use super::facts::FactPayload;
use super::state::{require_alive, require_not_over, require_phase, GameState, Phase, PlayerId, SocialClass};
use crate::domain::Card;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};

/// Sentiment step applied to the target (and to everyone on exposure).
const CHEAT_SENTIMENT_STEP: i8 = -1;
/// Trust lost by every witness when a cheat is exposed.
const EXPOSURE_TRUST_PENALTY: i16 = -20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheatJudgment {
    BigSuccess,
    Draw,
    BigFail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheatEffect {
    RevealHand,
    PeekHand,
    StealCard,
    SwapCard,
    SkipTurn,
    NoEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenderPenalty {
    RevealHand,
    SkipTurn,
}

/// Judge output after boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatVerdict {
    pub judgment: CheatJudgment,
    pub effect: CheatEffect,
    pub target_card_index: Option<usize>,
    pub defender_penalty: Option<DefenderPenalty>,
    pub narrative: String,
}

impl CheatVerdict {
    /// Used when the judge cannot be reached or answers nonsense.
    pub fn fallback() -> Self {
        CheatVerdict {
            judgment: CheatJudgment::Draw,
            effect: CheatEffect::NoEffect,
            target_card_index: None,
            defender_penalty: None,
            narrative: "Something stirred in the dark, but nothing came of it.".to_owned(),
        }
    }

    /// Only a big success carries an effect.
    pub fn normalized(mut self) -> Self {
        if self.judgment != CheatJudgment::BigSuccess {
            self.effect = CheatEffect::NoEffect;
            self.target_card_index = None;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatAttempt {
    pub attacker: PlayerId,
    pub target: PlayerId,
    pub method: String,
}

/// An attempt on the human seat awaiting their defense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCheat {
    pub attempt: CheatAttempt,
    /// Vague hint shown to the defender.
    pub warning: String,
    pub day: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatLogEntry {
    pub attacker: PlayerId,
    pub target: PlayerId,
    pub method: String,
    pub defense: String,
    pub judgment: CheatJudgment,
    pub effect: CheatEffect,
    pub defender_penalty: Option<DefenderPenalty>,
    pub narrative: String,
    pub day: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheatResolution {
    pub entry: CheatLogEntry,
    /// Set on `big_fail`: the attacker is revealed to the target and the table.
    pub exposed_attacker: Option<PlayerId>,
    /// Set when a steal emptied the target's hand.
    pub emptied_hand: Option<PlayerId>,
}

/// Check eligibility without mutating anything.
pub fn validate_cheat(
    state: &GameState,
    attacker: &PlayerId,
    target: &PlayerId,
) -> Result<(), DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Play)?;
    require_alive(state, attacker)?;
    let cheater = state.player(attacker)?;
    if cheater.class != SocialClass::Lower {
        return Err(DomainError::validation(
            ValidationKind::CheatNotAllowed,
            "Only the lower tier may cheat",
        ));
    }
    if !state.is_active(attacker) {
        return Err(DomainError::validation(
            ValidationKind::CheatNotAllowed,
            "Players who have gone out cannot cheat",
        ));
    }
    if cheater.cheat_used {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyUsed,
            "Cheat already used this night",
        ));
    }
    if attacker == target {
        return Err(DomainError::validation(
            ValidationKind::InvalidTarget,
            "Cannot cheat against yourself",
        ));
    }
    require_alive(state, target).map_err(|_| {
        DomainError::validation(ValidationKind::InvalidTarget, format!("{target} is not in play"))
    })?;
    if state.player(target)?.is_human && state.pending_cheat.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::PendingCheatExists,
            "A cheat against the human seat is already pending",
        ));
    }
    Ok(())
}

/// Consume the attacker's nightly allowance and open an attempt.
pub fn begin_cheat(
    state: &mut GameState,
    attacker: &PlayerId,
    target: &PlayerId,
    method: impl Into<String>,
) -> Result<CheatAttempt, DomainError> {
    validate_cheat(state, attacker, target)?;
    state.player_mut(attacker)?.cheat_used = true;
    Ok(CheatAttempt {
        attacker: attacker.clone(),
        target: target.clone(),
        method: method.into(),
    })
}

pub fn park_pending(
    state: &mut GameState,
    attempt: CheatAttempt,
    warning: impl Into<String>,
) -> Result<(), DomainError> {
    if state.pending_cheat.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::PendingCheatExists,
            "A cheat against the human seat is already pending",
        ));
    }
    state.pending_cheat = Some(PendingCheat {
        attempt,
        warning: warning.into(),
        day: state.day,
    });
    Ok(())
}

/// Remove the pending attempt aimed at `defender`.
pub fn take_pending(state: &mut GameState, defender: &PlayerId) -> Result<PendingCheat, DomainError> {
    match &state.pending_cheat {
        Some(p) if &p.attempt.target == defender => {}
        _ => {
            return Err(DomainError::not_found(
                NotFoundKind::PendingCheat,
                format!("No cheat pending against {defender}"),
            ))
        }
    }
    state
        .pending_cheat
        .take()
        .ok_or_else(|| DomainError::invariant("pending cheat vanished"))
}

/// Mark the night's cheat exchange settled once nothing is pending and the
/// human seat (if any) can no longer act. Returns the flag.
pub fn settle_cheat_phase(state: &mut GameState) -> bool {
    if state.pending_cheat.is_none() {
        let human_can_cheat = state.human().is_some_and(|h| {
            h.is_alive() && h.class == SocialClass::Lower && !h.cheat_used
        });
        if !human_can_cheat {
            state.cheat_phase_done = true;
        }
    }
    state.cheat_phase_done
}

/// The human seat declines (or is done with) tonight's cheat.
pub fn complete_cheat_phase(state: &mut GameState, who: &PlayerId) -> Result<(), DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Play)?;
    require_alive(state, who)?;
    if state.pending_cheat.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::PendingCheatExists,
            "A cheat still awaits a defense",
        ));
    }
    state.cheat_phase_done = true;
    Ok(())
}

/// Empty, near-empty or blanket defenses ("I guard against everything").
pub fn is_vacuous_defense(defense: &str) -> bool {
    let text = defense.trim();
    if text.chars().count() < 4 {
        return true;
    }
    const BLANKET_JA: &[&str] = &["すべて", "全部", "あらゆる", "完全に", "何もかも", "全て"];
    regex_is_match!(
        r"(?i)\b(everything|anything|all of it|every (possible|trick|method)|completely (block|prevent|stop)|all (tricks|methods|attacks))\b",
        text
    ) || BLANKET_JA.iter().any(|w| text.contains(w))
}

/// Over-broad defenses hand the attacker a big success and cost the defender.
pub fn correct_over_defense(verdict: CheatVerdict, defense: &str) -> CheatVerdict {
    if !is_vacuous_defense(defense) && verdict.defender_penalty.is_none() {
        return verdict;
    }
    let effect = match verdict.effect {
        CheatEffect::NoEffect => CheatEffect::RevealHand,
        other => other,
    };
    CheatVerdict {
        judgment: CheatJudgment::BigSuccess,
        effect,
        defender_penalty: Some(verdict.defender_penalty.unwrap_or(DefenderPenalty::RevealHand)),
        ..verdict
    }
}

/// Apply a judged attempt: effect, defender penalty, ledgers, facts and log.
pub fn resolve_cheat(
    state: &mut GameState,
    attempt: &CheatAttempt,
    defense: &str,
    verdict: CheatVerdict,
) -> Result<CheatResolution, DomainError> {
    require_not_over(state)?;
    state.player(&attempt.attacker)?;
    state.player(&attempt.target)?;
    let verdict = verdict.normalized();

    match verdict.effect {
        CheatEffect::RevealHand => state.player_mut(&attempt.target)?.hand_revealed = true,
        CheatEffect::SkipTurn => state.player_mut(&attempt.target)?.skip_next_turn = true,
        CheatEffect::StealCard => {
            let target = state.player_mut(&attempt.target)?;
            if !target.hand.is_empty() {
                let idx = verdict.target_card_index.unwrap_or(0).min(target.hand.len() - 1);
                let card = target.hand.remove(idx);
                state.player_mut(&attempt.attacker)?.hand.push(card);
            }
        }
        CheatEffect::SwapCard => swap_cards(state, attempt, verdict.target_card_index)?,
        CheatEffect::PeekHand | CheatEffect::NoEffect => {}
    }

    match verdict.defender_penalty {
        Some(DefenderPenalty::RevealHand) => state.player_mut(&attempt.target)?.hand_revealed = true,
        Some(DefenderPenalty::SkipTurn) => state.player_mut(&attempt.target)?.skip_next_turn = true,
        None => {}
    }

    let exposed = verdict.judgment == CheatJudgment::BigFail;
    if exposed {
        let witnesses: Vec<PlayerId> = state
            .players
            .iter()
            .map(|p| p.id.clone())
            .filter(|id| id != &attempt.attacker)
            .collect();
        for witness in &witnesses {
            state
                .relationships
                .adjust(witness, &attempt.attacker, CHEAT_SENTIMENT_STEP);
            state
                .trust
                .adjust(witness, &attempt.attacker, EXPOSURE_TRUST_PENALTY);
        }
        let round = state.day;
        state.facts.record(
            attempt.attacker.clone(),
            round,
            FactPayload::CheatExposed {
                target: attempt.target.clone(),
            },
        );
    } else {
        state
            .relationships
            .adjust(&attempt.target, &attempt.attacker, CHEAT_SENTIMENT_STEP);
    }

    let emptied_hand = {
        let target = state.player(&attempt.target)?;
        (target.hand.is_empty() && target.is_alive() && !state.has_finished(&target.id))
            .then(|| target.id.clone())
    };
    if let Some(id) = &emptied_hand {
        state.finish_order.push(id.clone());
    }

    let entry = CheatLogEntry {
        attacker: attempt.attacker.clone(),
        target: attempt.target.clone(),
        method: attempt.method.clone(),
        defense: defense.to_owned(),
        judgment: verdict.judgment,
        effect: verdict.effect,
        defender_penalty: verdict.defender_penalty,
        narrative: verdict.narrative,
        day: state.day,
    };
    state.cheat_log.push(entry.clone());

    Ok(CheatResolution {
        entry,
        exposed_attacker: exposed.then(|| attempt.attacker.clone()),
        emptied_hand,
    })
}

// Attacker's card at the clamped index trades places with the target's first card.
fn swap_cards(
    state: &mut GameState,
    attempt: &CheatAttempt,
    index: Option<usize>,
) -> Result<(), DomainError> {
    let attacker_len = state.player(&attempt.attacker)?.hand.len();
    if attacker_len == 0 || state.player(&attempt.target)?.hand.is_empty() {
        return Ok(());
    }
    let idx = index.unwrap_or(0).min(attacker_len - 1);
    let given: Card = state.player(&attempt.attacker)?.hand[idx];
    let taken = std::mem::replace(&mut state.player_mut(&attempt.target)?.hand[0], given);
    state.player_mut(&attempt.attacker)?.hand[idx] = taken;
    Ok(())
}
