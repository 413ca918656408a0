//! Victory evaluator: instant public/hidden conditions, then the night-end fallback.

use super::state::{GameState, HiddenWinCondition, Player, PlayerId, WinCondition};

/// Both emptied their hands and `a` did so first.
fn finished_before(state: &GameState, a: &PlayerId, b: &PlayerId) -> bool {
    let pos = |id: &PlayerId| state.finish_order.iter().position(|x| x == id);
    match (pos(a), pos(b)) {
        (Some(pa), Some(pb)) => pa < pb,
        _ => false,
    }
}

fn is_eliminated(state: &GameState, id: &PlayerId) -> bool {
    state.player(id).map(|p| p.eliminated).unwrap_or(false)
}

fn first_out(state: &GameState) -> Option<&PlayerId> {
    state.finish_order.first()
}

// Beating a target: they were voted out, or both went out and we were first.
fn outranked(state: &GameState, me: &PlayerId, target: &PlayerId) -> bool {
    is_eliminated(state, target) || finished_before(state, me, target)
}

// Helping a target: they survive and are first out.
fn helped(state: &GameState, target: &PlayerId) -> bool {
    !is_eliminated(state, target) && first_out(state) == Some(target)
}

fn public_clause(state: &GameState, player: &Player) -> Option<String> {
    let hit = match &player.win_condition {
        WinCondition::FinishFirst => first_out(state) == Some(&player.id),
        WinCondition::TriggerReversal => state.table.reversed,
        WinCondition::OutRank { target } => outranked(state, &player.id, target),
        WinCondition::Help { target } => helped(state, target),
    };
    hit.then(|| format!("public goal reached ({})", player.win_condition.describe()))
}

fn hidden_clause(state: &GameState, player: &Player) -> Option<String> {
    let hit = match &player.hidden_condition {
        HiddenWinCondition::RevengeOn { target } => outranked(state, &player.id, target),
        HiddenWinCondition::Protect { target } => helped(state, target),
        HiddenWinCondition::FirstOut => first_out(state) == Some(&player.id),
        HiddenWinCondition::Martyr => player.eliminated,
        HiddenWinCondition::Survive => false,
    };
    hit.then(|| format!("hidden goal reached ({})", player.hidden_condition.describe()))
}

/// Add every player whose public or hidden condition now holds.
/// Returns the newly declared winners; a no-op once the game is over.
pub fn check_instant_victories(state: &mut GameState) -> Vec<PlayerId> {
    if state.is_game_over() {
        return Vec::new();
    }
    let mut winners = Vec::new();
    let mut reasons = Vec::new();
    for player in &state.players {
        let parts: Vec<String> = [public_clause(state, player), hidden_clause(state, player)]
            .into_iter()
            .flatten()
            .collect();
        if !parts.is_empty() {
            winners.push(player.id.clone());
            reasons.push(format!("{}: {}", player.name, parts.join(" / ")));
        }
    }
    if !winners.is_empty() {
        state.winner_ids = winners.clone();
        state.victory_reason = Some(reasons.join("; "));
    }
    winners
}

/// Night-end evaluation: instant conditions first, then the survivors' fallback
/// when fewer than two live players still hold cards.
pub fn check_victory(state: &mut GameState) -> Vec<PlayerId> {
    let instant = check_instant_victories(state);
    if state.is_game_over() {
        return instant;
    }
    let holders = state
        .players
        .iter()
        .filter(|p| p.is_alive() && !p.hand.is_empty())
        .count();
    if holders > 1 {
        return Vec::new();
    }
    let survivors: Vec<&Player> = state.players.iter().filter(|p| p.is_alive()).collect();
    if survivors.is_empty() {
        return Vec::new();
    }
    let names: Vec<&str> = survivors.iter().map(|p| p.name.as_str()).collect();
    let winners: Vec<PlayerId> = survivors.iter().map(|p| p.id.clone()).collect();
    state.victory_reason = Some(format!(
        "Night ended with one hand left: survivors ({}) share the win",
        names.join(", ")
    ));
    state.winner_ids = winners.clone();
    winners
}
