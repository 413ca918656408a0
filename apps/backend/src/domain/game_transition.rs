use serde::{Deserialize, Serialize};

use crate::domain::state::{GameState, Phase, PlayerId};

/// The slice of state that lifecycle transitions are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLifecycleView {
    pub day: u16,
    pub phase: Phase,
    pub turn: Option<PlayerId>,
    pub game_over: bool,
}

impl GameLifecycleView {
    pub fn of(state: &GameState) -> Self {
        Self {
            day: state.day,
            phase: state.phase,
            turn: state.current_turn.clone(),
            game_over: state.is_game_over(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum GameTransition {
    /// Edge-triggered: the turn became a specific player.
    TurnBecame { player_id: PlayerId },
    /// Edge-triggered: night fell or day broke.
    PhaseChanged { phase: Phase, day: u16 },
    /// Edge-triggered: winners were declared.
    GameEnded,
}

/// Derive lifecycle transitions from before/after snapshots.
pub fn derive_game_transitions(
    before: &GameLifecycleView,
    after: &GameLifecycleView,
) -> Vec<GameTransition> {
    let mut transitions = Vec::new();

    if before.phase != after.phase || before.day != after.day {
        transitions.push(GameTransition::PhaseChanged {
            phase: after.phase,
            day: after.day,
        });
    }

    if let Some(player_id) = &after.turn {
        if before.turn.as_ref() != Some(player_id) && !after.game_over {
            transitions.push(GameTransition::TurnBecame {
                player_id: player_id.clone(),
            });
        }
    }

    if !before.game_over && after.game_over {
        transitions.push(GameTransition::GameEnded);
    }

    transitions
}
