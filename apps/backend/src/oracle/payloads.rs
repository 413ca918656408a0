//! Request and reply payloads crossing the oracle boundary.
//!
//! Replies keep loosely-typed fields (strings, signed indices) exactly as a
//! remote service might send them; [`super::validate`] turns them into
//! domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::state::PlayerId;
use crate::domain::Card;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeCheatRequest {
    pub attacker_method: String,
    pub defense_text: String,
    pub environment: String,
    pub defense_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCheatVerdict {
    #[serde(default)]
    pub judgment: String,
    #[serde(default)]
    pub effect_type: String,
    #[serde(default)]
    pub target_card_index: Option<i64>,
    #[serde(default)]
    pub defender_penalty: Option<String>,
    #[serde(default)]
    pub narrative: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    pub player_id: PlayerId,
    pub hand: Vec<Card>,
    pub table: Vec<Card>,
    pub reversed: bool,
    pub valid_plays: Vec<Vec<Card>>,
    pub opponents_hand_sizes: BTreeMap<PlayerId, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayReply {
    /// "play" or "pass".
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub chosen_combination_index: Option<i64>,
    #[serde(default)]
    pub flavor_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub voter: PlayerId,
    pub candidates: Vec<PlayerId>,
    pub recent_discussion: Vec<String>,
    pub logic_summaries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReply {
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub speaker: PlayerId,
    pub name: String,
    pub backstory: String,
    pub day: u16,
    pub recent_discussion: Vec<String>,
    /// Players the speaker considers friends.
    pub friends: Vec<PlayerId>,
    /// Deduction templates the speaker may lean on.
    pub logic_templates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechReply {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub next_speaker_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarnRequest {
    pub method: String,
    pub environment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarnReply {
    #[serde(default)]
    pub warning: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseRequest {
    pub defender: PlayerId,
    pub warning: String,
    pub environment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseReply {
    #[serde(default)]
    pub defense: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatProposalRequest {
    pub attacker: PlayerId,
    pub candidates: Vec<PlayerId>,
    pub environment: String,
    pub hand_sizes: BTreeMap<PlayerId, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatProposal {
    #[serde(default)]
    pub cheat: bool,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}
