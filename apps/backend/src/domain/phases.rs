//! Day/night transitions.

use super::facts::log_strong_card_plays;
use super::state::{GameState, Phase};

const NIGHT_SETTINGS: &[&str] = &[
    "A moonless night in the old manor; the candles gutter at every draft.",
    "Rain hammers the windows and thunder covers every small sound.",
    "A masked ball downstairs; the card room is lit by a single lamp.",
    "Fog rolls in from the harbour and the servants have gone to bed.",
    "The clock tower strikes midnight and the fire has burned low.",
];

/// Flavour text for the night that follows `day`.
pub fn night_setting(day: u16) -> &'static str {
    NIGHT_SETTINGS[usize::from(day) % NIGHT_SETTINGS.len()]
}

/// Night falls: the table is reset and every survivor gets a fresh allowance.
pub fn transition_to_play(state: &mut GameState) {
    state.phase = Phase::Play;
    let leftover = std::mem::take(&mut state.table.cards);
    state.discard.extend(leftover);
    state.table.leader = None;
    state.table.consecutive_passes = 0;
    state.table.clear_count = 0;
    state.votes.clear();
    state.eliminated_today = None;
    state.pending_cheat = None;
    state.cheat_phase_done = false;

    for player in state.players.iter_mut() {
        player.cheat_used = false;
        player.skip_next_turn = false;
    }

    state.turn_order = state.alive_ids();
    state.current_turn = state
        .turn_order
        .iter()
        .find(|id| state.is_active(id))
        .cloned();
    state.environment = night_setting(state.day).to_owned();
    let day = state.day;
    state.announce(format!("Night {day} falls. {}", state.environment));
}

/// Day breaks: strong plays are logged and the next discussion opens.
pub fn transition_to_discussion(state: &mut GameState) {
    log_strong_card_plays(state);
    if let Some(dropped) = state.pending_cheat.take() {
        state.announce(format!(
            "The scheme against {} fizzled out before dawn.",
            dropped.attempt.target
        ));
    }
    let leftover = std::mem::take(&mut state.table.cards);
    state.discard.extend(leftover);
    state.table.leader = None;
    state.table.consecutive_passes = 0;
    state.phase = Phase::Discussion;
    state.day += 1;
    state.votes.clear();
    state.eliminated_today = None;
    state.human_chat_today = 0;
    state.current_turn = None;
    let day = state.day;
    state.announce(format!("Day {day} begins."));
}
