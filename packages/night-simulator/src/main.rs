//! Night simulator CLI: runs all-NPC games in memory with the random oracle
//! and reports how often each social class wins.

mod metrics;
mod output;
mod simulator;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use metrics::{build_game_metrics, class_win_rates};
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "night-simulator")]
#[command(about = "In-memory all-NPC game simulator")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Seats per game
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u8).range(3..=8))]
    players: u8,

    /// Base seed; game `n` is dealt with `seed + n`
    #[arg(long)]
    seed: Option<u64>,

    /// Percent chance a lower-class NPC cheats each night
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u8).range(0..=100))]
    cheat_rate: u8,

    /// Write one JSON line per game to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Simulating {} games with {} seats", args.games, args.players);

    let mut output_writer = args.output.as_deref().map(OutputWriter::new).transpose()?;
    let simulator = Simulator::new(args.seed, args.cheat_rate);

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = match args.seed {
            Some(s) => s.wrapping_add(u64::from(game_num)),
            None => rand::random(),
        };

        match simulator.simulate_game(usize::from(args.players), game_seed).await {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                if let Some(writer) = output_writer.as_mut() {
                    let metrics = build_game_metrics(game_num, &result, duration_ms);
                    if let Err(e) = writer.write_game(&metrics) {
                        warn!("Failed to write metrics for game {}: {}", game_num, e);
                    }
                }
                info!(
                    "Game {} finished on day {}: winners={:?}",
                    game_num, result.days, result.winner_classes
                );
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    if let Some(writer) = output_writer {
        let path = writer.finish()?;
        println!("Results written to: {}", path.display());
    }

    print_summary(&results, errors, start.elapsed(), args.games);
    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let unresolved = results.iter().filter(|r| r.winners.is_empty()).count();
    let avg_days =
        results.iter().map(|r| f64::from(r.days)).sum::<f64>() / results.len() as f64;
    let cheats: usize = results.iter().map(|r| r.cheats).sum();
    let exposed: usize = results.iter().map(|r| r.exposed_cheats).sum();
    println!("Average days: {:.1}", avg_days);
    println!("Unresolved games: {}", unresolved);
    println!("Cheats: {} ({} exposed)", cheats, exposed);

    println!("\n=== Results by Class ===");
    for (class, stats) in class_win_rates(results) {
        println!(
            "{}: seats={}, wins={} ({:.1}%)",
            class,
            stats.seats,
            stats.wins,
            stats.win_rate()
        );
    }
}
