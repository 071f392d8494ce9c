//! Warfront - Entry Point
//!
//! Runs a scenario headless with each faction's standing orders and prints
//! the turn-by-turn outcome.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use warfront::core::config::set_config;
use warfront::core::types::FACTION_ORDER;
use warfront::{GameConfig, Result, Scenario, TurnOrchestrator, TurnRecord};

/// Headless theater war simulation
#[derive(Parser, Debug)]
#[command(name = "warfront")]
#[command(about = "Run an India/Pakistan theater scenario turn by turn")]
struct Args {
    /// Number of turns to run (defaults to the config's max_turns)
    #[arg(long)]
    turns: Option<u32>,

    /// Master seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON scenario file (defaults to the built-in demo theater)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Print the final game record as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warfront=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let turns = args.turns.unwrap_or(config.max_turns);
    if set_config(config.clone()).is_err() {
        tracing::warn!("Global config already set, keeping the first one");
    }

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::demo(),
    };
    tracing::info!("Warfront starting: '{}' with seed {}", scenario.name, config.seed);

    let [first, second] = FACTION_ORDER;
    let first_orders = scenario.orders.get(first).clone();
    let second_orders = scenario.orders.get(second).clone();
    let mut orchestrator = TurnOrchestrator::from_scenario(config, &scenario)?;

    for _ in 0..turns {
        if orchestrator.is_game_over() {
            break;
        }
        let record = orchestrator.execute_full_turn(&first_orders, &second_orders)?;
        if !args.json {
            print_turn(&record, &orchestrator);
        }
    }

    let game = orchestrator.game();
    if args.json {
        println!("{}", serde_json::to_string_pretty(game)?);
    } else {
        println!();
        println!("Final score: india {} / pakistan {}", game.india_vp, game.pakistan_vp);
        match game.winner {
            Some(winner) => println!("Winner: {:?}", winner),
            None => println!("Game still in progress after turn {}", game.turn),
        }
    }
    Ok(())
}

fn print_turn(record: &TurnRecord, orchestrator: &TurnOrchestrator) {
    println!(
        "=== Turn {} (day {}, {}, {}) ===",
        record.turn,
        record.day,
        record.time_of_day.as_str(),
        record.weather.as_str()
    );
    for report in &record.combat_reports {
        println!(
            "  [{:<14}] {} -> {}: {}",
            report.phase.as_str(),
            report.attacker_id,
            report.defender_id,
            report.headline().unwrap_or(report.result.as_str())
        );
    }
    let game = orchestrator.game();
    println!("  VP: india {} / pakistan {}", game.india_vp, game.pakistan_vp);
}
