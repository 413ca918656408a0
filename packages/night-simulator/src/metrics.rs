//! Per-game records and aggregate win rates.

use std::collections::BTreeMap;

use serde::Serialize;

use daifugo_backend::domain::SocialClass;

use crate::simulator::GameResult;

fn names(classes: &[SocialClass]) -> Vec<String> {
    classes.iter().map(|c| format!("{c:?}").to_lowercase()).collect()
}

/// One JSON line per game.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game: u32,
    pub seed: u64,
    pub players: usize,
    pub days: u16,
    pub classes: Vec<String>,
    pub winners: Vec<String>,
    pub winner_classes: Vec<String>,
    pub reason: Option<String>,
    pub eliminated: usize,
    pub cheats: usize,
    pub exposed_cheats: usize,
    pub reversed: bool,
    pub duration_ms: f64,
}

pub fn build_game_metrics(game: u32, result: &GameResult, duration_ms: f64) -> GameMetrics {
    GameMetrics {
        game,
        seed: result.seed,
        players: result.classes.len(),
        days: result.days,
        classes: names(&result.classes),
        winners: result.winners.iter().map(ToString::to_string).collect(),
        winner_classes: names(&result.winner_classes),
        reason: result.reason.clone(),
        eliminated: result.eliminated,
        cheats: result.cheats,
        exposed_cheats: result.exposed_cheats,
        reversed: result.reversed,
        duration_ms,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassStats {
    pub seats: u32,
    pub wins: u32,
}

impl ClassStats {
    pub fn win_rate(&self) -> f64 {
        if self.seats == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.seats) * 100.0
    }
}

/// Seat-weighted win rate per class: wins by that class over seats of it.
pub fn class_win_rates(results: &[GameResult]) -> BTreeMap<String, ClassStats> {
    let mut stats: BTreeMap<String, ClassStats> = BTreeMap::new();
    for result in results {
        for class in &result.classes {
            stats.entry(format!("{class:?}")).or_default().seats += 1;
        }
        for class in &result.winner_classes {
            stats.entry(format!("{class:?}")).or_default().wins += 1;
        }
    }
    stats
}
