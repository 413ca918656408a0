use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cheat::{CheatLogEntry, PendingCheat};
use super::facts::FactLog;
use super::relationships::{RelationshipLedger, ScoreLedger};
use super::rules::DECK_SIZE;
use crate::domain::Card;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Stable identifier of a game held in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        GameId(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Seat identity; also the key of every pairwise ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_owned())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Day/night alternation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Day: chat, claims and voting. No card play.
    Discussion,
    /// Night: card play, passes, cheats and investigation.
    Play,
}

/// Secret social tier.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialClass {
    Upper,
    Middle,
    Lower,
}

/// Secondary role, only ever held by a middle-tier player.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameRole {
    #[default]
    None,
    Detective,
    Accomplice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WinCondition {
    FinishFirst,
    TriggerReversal,
    OutRank { target: PlayerId },
    Help { target: PlayerId },
}

impl WinCondition {
    pub fn describe(&self) -> String {
        match self {
            WinCondition::FinishFirst => "finish your hand first".to_owned(),
            WinCondition::TriggerReversal => "trigger a revolution".to_owned(),
            WinCondition::OutRank { target } => format!("finish ahead of {target}"),
            WinCondition::Help { target } => format!("help {target} finish first"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HiddenWinCondition {
    RevengeOn { target: PlayerId },
    Protect { target: PlayerId },
    FirstOut,
    Martyr,
    /// Default: win only through the night-end fallback.
    #[default]
    Survive,
}

impl HiddenWinCondition {
    pub fn describe(&self) -> String {
        match self {
            HiddenWinCondition::RevengeOn { target } => format!("take revenge on {target}"),
            HiddenWinCondition::Protect { target } => format!("protect {target}"),
            HiddenWinCondition::FirstOut => "be the first out".to_owned(),
            HiddenWinCondition::Martyr => "be eliminated by vote".to_owned(),
            HiddenWinCondition::Survive => "survive to the end".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredRelationship {
    pub target: PlayerId,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_human: bool,
    pub class: SocialClass,
    pub role: GameRole,
    pub win_condition: WinCondition,
    pub hidden_condition: HiddenWinCondition,
    pub backstory: String,
    pub relationships: Vec<DeclaredRelationship>,
    pub hand: Vec<Card>,
    /// Every card this player has put down, across all nights.
    pub played: Vec<Card>,
    pub eliminated: bool,
    pub skip_next_turn: bool,
    pub cheat_used: bool,
    pub hand_revealed: bool,
}

impl Player {
    pub fn is_alive(&self) -> bool {
        !self.eliminated
    }
}

/// The shared table during a night.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    /// Combination to beat; empty after a clear.
    pub cards: Vec<Card>,
    /// Who placed `cards`.
    pub leader: Option<PlayerId>,
    pub consecutive_passes: usize,
    /// Clears so far this night.
    pub clear_count: u8,
    pub reversed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `None` for system announcements.
    pub speaker: Option<PlayerId>,
    pub text: String,
    pub day: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub investigator: PlayerId,
    pub subject: PlayerId,
    pub finding: SocialClass,
    pub day: u16,
}

/// Entire game container, sufficient for pure domain operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: GameId,
    pub phase: Phase,
    /// 1-based; increments each time a night ends.
    pub day: u16,
    /// Seat order.
    pub players: Vec<Player>,
    pub table: TableState,
    pub discard: Vec<Card>,
    /// Seats taking part in the current night, in turn order.
    pub turn_order: Vec<PlayerId>,
    pub current_turn: Option<PlayerId>,
    /// Players who emptied their hands, first out first.
    pub finish_order: Vec<PlayerId>,
    /// voter -> target, cleared every night.
    pub votes: BTreeMap<PlayerId, PlayerId>,
    pub eliminated_today: Option<PlayerId>,
    pub winner_ids: Vec<PlayerId>,
    pub victory_reason: Option<String>,
    pub relationships: RelationshipLedger,
    pub trust: ScoreLedger,
    pub affinity: ScoreLedger,
    pub facts: FactLog,
    pub cheat_log: Vec<CheatLogEntry>,
    pub pending_cheat: Option<PendingCheat>,
    /// NPC turns wait until the night's cheat exchange is settled.
    pub cheat_phase_done: bool,
    pub investigation: Option<Investigation>,
    pub chat: Vec<ChatMessage>,
    pub human_chat_today: u8,
    /// Night flavour handed to the cheat judge.
    pub environment: String,
}

impl GameState {
    pub fn player(&self, id: &PlayerId) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("No player {id}")))
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player, DomainError> {
        self.players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("No player {id}")))
    }

    pub fn is_game_over(&self) -> bool {
        !self.winner_ids.is_empty()
    }

    pub fn has_finished(&self, id: &PlayerId) -> bool {
        self.finish_order.contains(id)
    }

    /// Non-eliminated and still holding cards.
    pub fn is_active(&self, id: &PlayerId) -> bool {
        self.player(id)
            .map(|p| p.is_alive() && !self.has_finished(id))
            .unwrap_or(false)
    }

    pub fn active_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_alive() && !self.has_finished(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn alive_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn human(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_human)
    }

    pub fn npc_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.is_human)
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn name_of(&self, id: &PlayerId) -> String {
        self.player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|_| id.to_string())
    }

    pub fn announce(&mut self, text: impl Into<String>) {
        self.chat.push(ChatMessage {
            speaker: None,
            text: text.into(),
            day: self.day,
        });
    }

    /// Cards across hands, table and discard pile.
    pub fn card_total(&self) -> usize {
        self.players.iter().map(|p| p.hand.len()).sum::<usize>()
            + self.table.cards.len()
            + self.discard.len()
    }
}

/// Reject every mutation once winners are declared.
pub fn require_not_over(state: &GameState) -> Result<(), DomainError> {
    if state.is_game_over() {
        return Err(DomainError::validation(
            ValidationKind::GameOver,
            "The game is already over",
        ));
    }
    Ok(())
}

pub fn require_phase(state: &GameState, phase: Phase) -> Result<(), DomainError> {
    if state.phase != phase {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("Not allowed during {:?}", state.phase),
        ));
    }
    Ok(())
}

pub fn require_alive(state: &GameState, id: &PlayerId) -> Result<(), DomainError> {
    if !state.player(id)?.is_alive() {
        return Err(DomainError::validation(
            ValidationKind::PlayerEliminated,
            format!("{id} has been eliminated"),
        ));
    }
    Ok(())
}

/// Hands, table and discard always hold the full deck.
pub fn require_card_conservation(state: &GameState) -> Result<(), DomainError> {
    let total = state.card_total();
    if total != DECK_SIZE {
        return Err(DomainError::invariant(format!(
            "card count is {total}, expected {DECK_SIZE}"
        )));
    }
    Ok(())
}

/// During a night with two or more active players the pointer names one of them.
pub fn require_turn_pointer(state: &GameState) -> Result<(), DomainError> {
    if state.phase != Phase::Play || state.is_game_over() {
        return Ok(());
    }
    let active = state.active_ids();
    if active.len() < 2 {
        return Ok(());
    }
    match &state.current_turn {
        Some(id) if active.contains(id) => Ok(()),
        Some(id) => Err(DomainError::invariant(format!(
            "turn pointer on inactive player {id}"
        ))),
        None => Err(DomainError::invariant("no turn pointer during play")),
    }
}
