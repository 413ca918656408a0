//! Day chat and self-declared claims.

use lazy_regex::regex_is_match;

use super::facts::{record_claim, Claim};
use super::state::{
    require_alive, require_not_over, require_phase, ChatMessage, GameRole, GameState, Phase,
    PlayerId, SocialClass,
};
use crate::errors::domain::{DomainError, ValidationKind};

/// Recognise a role or class declaration in free chat text.
pub fn detect_claim(text: &str) -> Option<Claim> {
    if regex_is_match!(r"(?i)\bi(?:'m| am)\s+(?:the\s+|a\s+)?detective\b", text)
        || text.contains("探偵CO")
        || text.contains("探偵です")
        || text.contains("私が探偵")
    {
        return Some(Claim::Role(GameRole::Detective));
    }
    if regex_is_match!(r"(?i)\bi(?:'m| am)\s+(?:the\s+|a\s+)?(?:middle|commoner)\b", text)
        || text.contains("平民")
    {
        return Some(Claim::Class(SocialClass::Middle));
    }
    if regex_is_match!(r"(?i)\bi(?:'m| am)\s+(?:the\s+|a\s+)?(?:upper|rich|noble)\b", text)
        || text.contains("富豪")
    {
        return Some(Claim::Class(SocialClass::Upper));
    }
    if regex_is_match!(r"(?i)\bi(?:'m| am)\s+(?:the\s+|a\s+)?(?:lower|poor)\b", text)
        || text.contains("貧民")
    {
        return Some(Claim::Class(SocialClass::Lower));
    }
    None
}

/// Append a chat line. The human seat is capped at `human_daily_limit` lines per day.
/// Any claim found in the text is logged as a fact.
pub fn post_chat(
    state: &mut GameState,
    speaker: &PlayerId,
    text: &str,
    human_daily_limit: u8,
) -> Result<Option<Claim>, DomainError> {
    require_not_over(state)?;
    require_phase(state, Phase::Discussion)?;
    require_alive(state, speaker)?;
    let is_human = state.player(speaker)?.is_human;
    if is_human && state.human_chat_today >= human_daily_limit {
        return Err(DomainError::validation(
            ValidationKind::ChatLimitReached,
            format!("Only {human_daily_limit} messages per day"),
        ));
    }

    state.chat.push(ChatMessage {
        speaker: Some(speaker.clone()),
        text: text.to_owned(),
        day: state.day,
    });
    if is_human {
        state.human_chat_today += 1;
    }
    let claim = detect_claim(text);
    if let Some(claim) = claim {
        record_claim(state, speaker, claim);
    }
    Ok(claim)
}

/// Record an explicit structured claim. Returns false for a same-day repeat.
pub fn declare_claim(
    state: &mut GameState,
    actor: &PlayerId,
    claim: Claim,
) -> Result<bool, DomainError> {
    require_not_over(state)?;
    require_alive(state, actor)?;
    Ok(record_claim(state, actor, claim))
}
