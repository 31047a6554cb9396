//! Self-play CLI for Azul
//!
//! Plays seeded games between random agents and reports the results.

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use azul::agent::{play_game, GameRecord, RandomAgent};
use azul::display::{format_action, render_snapshot, Style};
use azul::{GameConfig, GameEngine, PlayerIdx};

/// Random self-play for Azul
#[derive(Parser, Debug)]
#[command(name = "azul")]
#[command(about = "Play seeded random self-play games of Azul", long_about = None)]
struct Args {
    /// Number of players (2-4)
    #[arg(long, default_value_t = 2)]
    players: u8,

    /// Seed of the first game; game `i` uses `seed + i`. Random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u64,

    /// Player who opens the first round
    #[arg(long, default_value_t = 0)]
    starting_player: u8,

    /// Print the final boards of every game
    #[arg(long, default_value_t = false)]
    show_boards: bool,

    /// Print the moves of every game
    #[arg(long, default_value_t = false)]
    show_moves: bool,

    /// Emit one JSON line per game instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Disable ANSI colors in board output
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

/// One line of `--json` output
#[derive(Serialize)]
struct GameSummary<'a> {
    game: u64,
    seed: Option<u64>,
    moves: usize,
    rounds: u32,
    final_scores: &'a [u16],
    winners: &'a [PlayerIdx],
}

impl<'a> GameSummary<'a> {
    fn new(game: u64, record: &'a GameRecord) -> Self {
        Self {
            game,
            seed: record.seed,
            moves: record.moves.len(),
            rounds: record.rounds,
            final_scores: &record.final_scores,
            winners: &record.winners,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let style = if args.no_color {
        Style::PLAIN
    } else {
        Style::ANSI
    };
    let base_seed = args.seed.unwrap_or_else(rand::random);

    let mut wins = vec![0u64; args.players as usize];
    for game in 0..args.games {
        let seed = base_seed.wrapping_add(game);
        let config = GameConfig::new(args.players)
            .with_seed(seed)
            .with_starting_player(args.starting_player);
        let mut engine = GameEngine::new(config)?;
        let mut agents = vec![RandomAgent::new(); engine.num_players()];
        // Agents draw from their own stream so the bag stays tied to `seed`.
        let mut rng = StdRng::seed_from_u64(seed.rotate_left(32));

        let record = play_game(&mut engine, &mut agents, &mut rng)?;
        for &w in &record.winners {
            wins[w] += 1;
        }

        if args.json {
            println!("{}", serde_json::to_string(&GameSummary::new(game, &record))?);
            continue;
        }

        println!(
            "game {} (seed {}): {} rounds, {} moves, scores {:?}, winners {:?}",
            game,
            seed,
            record.rounds,
            record.moves.len(),
            record.final_scores,
            record.winners
        );
        if args.show_moves {
            for m in &record.moves {
                println!("  P{}: {}", m.player, format_action(&m.action));
            }
        }
        if args.show_boards {
            println!("{}", render_snapshot(&engine.snapshot(), style));
        }
    }

    if !args.json && args.games > 1 {
        for (p, w) in wins.iter().enumerate() {
            println!("player {p}: {w} win(s) of {}", args.games);
        }
    }
    Ok(())
}
