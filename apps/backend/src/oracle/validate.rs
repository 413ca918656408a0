//! Boundary validation of oracle replies.
//!
//! Nothing an oracle returns reaches the engine unchecked. Unknown enum
//! strings collapse to safe defaults, indices are range-checked, and ids must
//! name an eligible player; anything else falls back to a random legal choice.

use rand::Rng;

use super::payloads::{CheatProposal, DefenseReply, PlayReply, RawCheatVerdict, SpeechReply, VoteReply, WarnReply};
use crate::domain::cheat::{CheatEffect, CheatJudgment, CheatVerdict, DefenderPenalty};
use crate::domain::state::PlayerId;
use crate::domain::Card;

pub const DEFAULT_WARNING: &str = "You sense someone at the table is plotting against you.";
pub const DEFAULT_DEFENSE: &str = "I keep my cards close and watch the dealer's hands.";
pub const DEFAULT_CHEAT_METHOD: &str = "slips a marked card into the pile while nobody is looking";
const MAX_SPEECH_CHARS: usize = 280;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayDecision {
    Play(Vec<Card>),
    Pass,
}

// "Big Success", "big-success" and "BIG_SUCCESS" all normalise to "big_success".
fn normalise(token: &str) -> String {
    token
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

pub fn parse_judgment(token: &str) -> Option<CheatJudgment> {
    match normalise(token).as_str() {
        "big_success" | "success" => Some(CheatJudgment::BigSuccess),
        "draw" => Some(CheatJudgment::Draw),
        "big_fail" | "big_failure" | "fail" => Some(CheatJudgment::BigFail),
        _ => None,
    }
}

pub fn parse_effect(token: &str) -> CheatEffect {
    match normalise(token).as_str() {
        "reveal_hand" => CheatEffect::RevealHand,
        "peek_hand" => CheatEffect::PeekHand,
        "steal_card" => CheatEffect::StealCard,
        "swap_card" => CheatEffect::SwapCard,
        "skip_turn" => CheatEffect::SkipTurn,
        _ => CheatEffect::NoEffect,
    }
}

pub fn parse_penalty(token: Option<&str>) -> Option<DefenderPenalty> {
    match normalise(token?).as_str() {
        "reveal_hand" => Some(DefenderPenalty::RevealHand),
        "skip_turn" => Some(DefenderPenalty::SkipTurn),
        _ => None,
    }
}

/// An unknown judgment voids the whole reply.
pub fn verdict_from_reply(raw: RawCheatVerdict) -> CheatVerdict {
    let Some(judgment) = parse_judgment(&raw.judgment) else {
        return CheatVerdict::fallback();
    };
    let narrative = raw
        .narrative
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| CheatVerdict::fallback().narrative);
    CheatVerdict {
        judgment,
        effect: parse_effect(&raw.effect_type),
        target_card_index: raw.target_card_index.and_then(|i| usize::try_from(i).ok()),
        defender_penalty: parse_penalty(raw.defender_penalty.as_deref()),
        narrative,
    }
    .normalized()
}

/// Uniform choice among legal plays. Passing is only offered on a live table.
pub fn random_play<R: Rng>(valid_plays: &[Vec<Card>], table_empty: bool, rng: &mut R) -> PlayDecision {
    if valid_plays.is_empty() {
        return PlayDecision::Pass;
    }
    let options = valid_plays.len() + usize::from(!table_empty);
    match valid_plays.get(rng.random_range(0..options)) {
        Some(play) => PlayDecision::Play(play.clone()),
        None => PlayDecision::Pass,
    }
}

pub fn play_from_reply<R: Rng>(
    reply: &PlayReply,
    valid_plays: &[Vec<Card>],
    table_empty: bool,
    rng: &mut R,
) -> PlayDecision {
    match normalise(&reply.action).as_str() {
        "pass" if !table_empty => PlayDecision::Pass,
        "play" => reply
            .chosen_combination_index
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| valid_plays.get(i))
            .map(|play| PlayDecision::Play(play.clone()))
            .unwrap_or_else(|| random_play(valid_plays, table_empty, rng)),
        _ => random_play(valid_plays, table_empty, rng),
    }
}

pub fn random_vote<R: Rng>(candidates: &[PlayerId], rng: &mut R) -> Option<PlayerId> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())].clone())
}

/// The target must be one of `candidates` (live, not the voter).
pub fn vote_from_reply<R: Rng>(
    reply: &VoteReply,
    candidates: &[PlayerId],
    rng: &mut R,
) -> Option<PlayerId> {
    let wanted = reply.target_id.trim();
    candidates
        .iter()
        .find(|c| c.0 == wanted)
        .cloned()
        .or_else(|| random_vote(candidates, rng))
}

/// Empty lines are dropped; long ones are cut.
pub fn speech_from_reply(reply: &SpeechReply) -> Option<String> {
    let text = reply.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_SPEECH_CHARS).collect())
}

pub fn warning_from_reply(reply: &WarnReply) -> String {
    let text = reply.warning.trim();
    if text.is_empty() {
        DEFAULT_WARNING.to_owned()
    } else {
        text.to_owned()
    }
}

pub fn defense_from_reply(reply: DefenseReply) -> (String, Option<String>) {
    let defense = reply.defense.trim();
    let defense = if defense.is_empty() {
        DEFAULT_DEFENSE.to_owned()
    } else {
        defense.to_owned()
    };
    (defense, reply.category.filter(|c| !c.trim().is_empty()))
}

/// `Some((target, method))` when the proposal names an eligible target.
pub fn proposal_from_reply(
    reply: &CheatProposal,
    candidates: &[PlayerId],
) -> Option<(PlayerId, String)> {
    if !reply.cheat {
        return None;
    }
    let wanted = reply.target_id.as_deref()?.trim();
    let target = candidates.iter().find(|c| c.0 == wanted)?.clone();
    let method = reply
        .method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_CHEAT_METHOD)
        .to_owned();
    Some((target, method))
}
