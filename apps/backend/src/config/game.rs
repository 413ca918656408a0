use std::time::Duration;

use super::env_or;
use crate::error::AppError;
use crate::oracle::http::DEFAULT_TIMEOUT_MS;

pub const DEFAULT_DAY_CHAT_MAX: u8 = 5;
pub const DEFAULT_NPC_CHEAT_RATE: u8 = 40;

/// Knobs of the game-flow service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Debug mode: every view shows every secret.
    pub reveal_all: bool,
    /// Chat lines the human seat may post per day.
    pub day_chat_max: u8,
    /// Percent chance an eligible NPC cheats when the oracle cannot decide.
    pub npc_cheat_rate: u8,
    /// Upper bound on each oracle call made by the service.
    pub oracle_timeout: Duration,
    /// Seed for service-side randomness (vote tie-breaks, fallbacks).
    pub rng_seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            reveal_all: false,
            day_chat_max: DEFAULT_DAY_CHAT_MAX,
            npc_cheat_rate: DEFAULT_NPC_CHEAT_RATE,
            oracle_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            rng_seed: None,
        }
    }
}

impl GameSettings {
    pub fn from_env() -> Result<Self, AppError> {
        let npc_cheat_rate: u8 = env_or("GAME_NPC_CHEAT_RATE", DEFAULT_NPC_CHEAT_RATE)?;
        if npc_cheat_rate > 100 {
            return Err(AppError::config(format!(
                "GAME_NPC_CHEAT_RATE must be 0..=100, got {npc_cheat_rate}"
            )));
        }
        let seed: u64 = env_or("ORACLE_SEED", 0)?;
        Ok(Self {
            reveal_all: env_or("GAME_REVEAL_ALL", false)?,
            day_chat_max: env_or("GAME_DAY_CHAT_MAX", DEFAULT_DAY_CHAT_MAX)?,
            npc_cheat_rate,
            oracle_timeout: Duration::from_millis(env_or("ORACLE_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?),
            rng_seed: (seed != 0).then_some(seed),
        })
    }
}
