//! Complete all-NPC games driven through the game-flow service.

use std::sync::Arc;

use daifugo_backend::domain::cheat::CheatJudgment;
use daifugo_backend::domain::state::{GameId, GameState, PlayerId, SocialClass};
use daifugo_backend::domain::{GameSetup, SeatSpec};
use daifugo_backend::errors::ErrorCode;
use daifugo_backend::{AppError, GameFlowService, GameSettings, GameStore, InMemoryGameStore, RandomOracle};
use tracing::debug;

/// A game still running after this many days is reported as unresolved.
const MAX_DAYS: u16 = 30;

const NAMES: &[&str] = &[
    "Akane", "Bunta", "Chiyo", "Daigo", "Emi", "Fujio", "Gin", "Hana",
];

/// Outcome of one simulated game.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub seed: u64,
    pub days: u16,
    /// Class of every seat, in seat order.
    pub classes: Vec<SocialClass>,
    pub winners: Vec<PlayerId>,
    pub winner_classes: Vec<SocialClass>,
    pub reason: Option<String>,
    pub eliminated: usize,
    pub cheats: usize,
    pub exposed_cheats: usize,
    pub reversed: bool,
}

pub struct Simulator {
    service: GameFlowService,
}

impl Simulator {
    pub fn new(seed: Option<u64>, npc_cheat_rate: u8) -> Self {
        let store = Arc::new(InMemoryGameStore::new());
        let oracle = Arc::new(RandomOracle::new(seed));
        let settings = GameSettings {
            npc_cheat_rate,
            rng_seed: seed,
            ..GameSettings::default()
        };
        Self {
            service: GameFlowService::new(store, oracle, settings),
        }
    }

    pub async fn simulate_game(&self, players: usize, seed: u64) -> Result<GameResult, AppError> {
        let setup = GameSetup {
            seats: NAMES
                .iter()
                .take(players)
                .enumerate()
                .map(|(i, name)| SeatSpec {
                    id: PlayerId(format!("p{i}")),
                    name: (*name).to_owned(),
                    is_human: false,
                    backstory: String::new(),
                    relationships: Vec::new(),
                })
                .collect(),
            seed,
        };
        let id = self.service.create_game(&setup).await?.game_id;

        for _ in 0..MAX_DAYS {
            if self.load(id).await?.is_game_over() {
                break;
            }
            self.service.run_discussion(id).await?;
            self.service.collect_npc_votes(id).await?;
            let day = self.service.end_day(id).await?;
            debug!(%id, day = day.state.day, eliminated = ?day.outcome.eliminated, "day simulated");
        }

        let state = self.load(id).await?;
        self.service.delete_game(id).await?;
        Ok(summarise(&state, seed))
    }

    async fn load(&self, id: GameId) -> Result<GameState, AppError> {
        self.service
            .store()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(ErrorCode::GameNotFound, format!("Game {id} vanished")))
    }
}

fn summarise(state: &GameState, seed: u64) -> GameResult {
    let class_of = |id: &PlayerId| state.player(id).map(|p| p.class).ok();
    GameResult {
        seed,
        days: state.day,
        classes: state.players.iter().map(|p| p.class).collect(),
        winners: state.winner_ids.clone(),
        winner_classes: state.winner_ids.iter().filter_map(class_of).collect(),
        reason: state.victory_reason.clone(),
        eliminated: state.players.iter().filter(|p| p.eliminated).count(),
        cheats: state.cheat_log.len(),
        exposed_cheats: state
            .cheat_log
            .iter()
            .filter(|e| e.judgment == CheatJudgment::BigFail)
            .count(),
        reversed: state.table.reversed,
    }
}
