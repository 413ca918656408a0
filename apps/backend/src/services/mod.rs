pub mod game_flow;
pub mod game_store;

pub use game_flow::{GameFlowMutationResult, GameFlowService};
pub use game_store::{GameStore, InMemoryGameStore};
