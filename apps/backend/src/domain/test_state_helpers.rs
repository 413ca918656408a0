//! Hand-built game states for domain unit tests.

use crate::domain::cards_parsing::try_parse_cards;
use crate::domain::dealing::full_deck;
use crate::domain::facts::FactLog;
use crate::domain::relationships::{RelationshipLedger, ScoreLedger};
use crate::domain::state::{
    GameId, GameRole, GameState, HiddenWinCondition, Phase, Player, PlayerId, SocialClass,
    TableState, WinCondition,
};
use crate::domain::Card;

pub fn cards(codes: &[&str]) -> Vec<Card> {
    try_parse_cards(codes).expect("valid card codes")
}

pub fn pid(s: &str) -> PlayerId {
    PlayerId::from(s)
}

/// A goal that can never be met, so tests only see the conditions they set.
pub fn inert_goal() -> WinCondition {
    WinCondition::Help {
        target: pid("nobody"),
    }
}

pub fn player(id: &str, class: SocialClass, hand: &[&str]) -> Player {
    Player {
        id: pid(id),
        name: id.to_uppercase(),
        is_human: false,
        class,
        role: GameRole::None,
        win_condition: inert_goal(),
        hidden_condition: HiddenWinCondition::Survive,
        backstory: String::new(),
        relationships: Vec::new(),
        hand: cards(hand),
        played: Vec::new(),
        eliminated: false,
        skip_next_turn: false,
        cheat_used: false,
        hand_revealed: false,
    }
}

/// Night 1 with the first player to act; undealt cards sit in the discard pile
/// so the 54-card total holds.
pub fn night_state(players: Vec<Player>) -> GameState {
    let mut discard = full_deck();
    for p in &players {
        for card in &p.hand {
            let pos = discard
                .iter()
                .position(|c| c == card)
                .expect("test hands must not repeat cards");
            discard.remove(pos);
        }
    }
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id.clone()).collect();
    GameState {
        game_id: GameId::new(),
        phase: Phase::Play,
        day: 1,
        table: TableState::default(),
        discard,
        turn_order: ids.clone(),
        current_turn: ids.first().cloned(),
        finish_order: Vec::new(),
        votes: Default::default(),
        eliminated_today: None,
        winner_ids: Vec::new(),
        victory_reason: None,
        relationships: RelationshipLedger::seed(&ids, Vec::<(&PlayerId, &PlayerId, &str)>::new()),
        trust: ScoreLedger::seed(&ids),
        affinity: ScoreLedger::seed(&ids),
        facts: FactLog::default(),
        cheat_log: Vec::new(),
        pending_cheat: None,
        cheat_phase_done: true,
        investigation: None,
        chat: Vec::new(),
        human_chat_today: 0,
        environment: "test night".into(),
        players,
    }
}

pub fn day_state(players: Vec<Player>) -> GameState {
    let mut state = night_state(players);
    state.phase = Phase::Discussion;
    state.current_turn = None;
    state
}

/// Put `combo` on the table as if `leader` had played it, keeping the card total.
pub fn place_on_table(state: &mut GameState, leader: &str, combo: &[&str]) {
    let combo = cards(combo);
    for card in &combo {
        let pos = state
            .discard
            .iter()
            .position(|c| c == card)
            .expect("table cards must come from the discard pile");
        state.discard.remove(pos);
    }
    state.table.cards = combo;
    state.table.leader = Some(pid(leader));
}
