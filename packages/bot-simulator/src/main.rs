//! Bot simulator CLI: plays bot-only Bondi or Digu games in memory and
//! prints JSON statistics.

mod simulator;
mod summary;

use std::time::Instant;

use cardroom::domain::bondi::{BONDI_MAX_PLAYERS, BONDI_MIN_PLAYERS};
use cardroom::GameKind;
use clap::{Parser, ValueEnum};
use rand::Rng;
use simulator::Simulator;
use summary::summarize;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bot-simulator")]
#[command(about = "Play bot-only card games in memory and report outcome statistics")]
struct Args {
    /// Which game to simulate
    #[arg(long, default_value = "bondi")]
    game: GameArg,

    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Base seed; game N uses seed + N
    #[arg(long)]
    seed: Option<u64>,

    /// Bots at the table (Bondi only; Digu always seats four)
    #[arg(long, default_value = "4")]
    players: usize,

    /// Log every turn and print each game record
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GameArg {
    Bondi,
    Digu,
}

impl From<GameArg> for GameKind {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Bondi => GameKind::Bondi,
            GameArg::Digu => GameKind::Digu,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let kind = GameKind::from(args.game);
    if kind == GameKind::Bondi && !(BONDI_MIN_PLAYERS..=BONDI_MAX_PLAYERS).contains(&args.players) {
        return Err(format!(
            "--players must be between {BONDI_MIN_PLAYERS} and {BONDI_MAX_PLAYERS} for bondi"
        )
        .into());
    }

    let base_seed = args.seed.unwrap_or_else(|| rand::rng().random());
    info!(game = %kind, games = args.games, base_seed, "Starting simulation");

    let simulator = Simulator::new(kind, args.players);
    let start = Instant::now();
    let mut outcomes = Vec::new();
    let mut errors = 0;

    for game_no in 1..=args.games {
        let seed = base_seed.wrapping_add(u64::from(game_no));
        match simulator.simulate_game(game_no, seed) {
            Ok(outcome) => {
                if args.verbose {
                    eprintln!("{}", serde_json::to_string(&outcome)?);
                }
                if outcome.stalled {
                    warn!(game_no, seed, turns = outcome.turns, "Game stalled");
                }
                outcomes.push(outcome);
            }
            Err(err) => {
                errors += 1;
                warn!(game_no, seed, error = %err, "Game failed");
            }
        }
    }

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let summary = summarize(kind.as_str(), args.games, &outcomes, errors, elapsed_ms);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
