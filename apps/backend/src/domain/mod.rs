//! Domain layer: the pure rules engine. Every operation is a synchronous
//! transform of one `GameState`.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod cheat;
pub mod dealing;
pub mod deduction;
pub mod discussion;
pub mod facts;
pub mod game_transition;
pub mod investigation;
pub mod phases;
pub mod player_view;
pub mod relationships;
pub mod rules;
pub mod seed_derivation;
pub mod setup;
pub mod state;
pub mod turns;
pub mod victory;
pub mod voting;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod test_state_helpers;
#[cfg(test)]
mod tests_cheat;
#[cfg(test)]
mod tests_deduction;
#[cfg(test)]
mod tests_player_view;
#[cfg(test)]
mod tests_props_invariants;
#[cfg(test)]
mod tests_turns;
#[cfg(test)]
mod tests_victory_voting;

// Re-exports for ergonomics
pub use cards_logic::{can_play, classify, combo_beats, get_valid_plays, PlayShape};
pub use cards_types::{Card, Rank, Suit};
pub use dealing::deal_hands;
pub use deduction::{compute_deduction, DeductionReport};
pub use setup::{new_game, GameSetup, SeatSpec};
pub use state::{GameId, GameState, Phase, PlayerId, SocialClass};
