// ═══════════════════════════════════════════════════════════════════════
// Runner — CLI entry point for games, tournaments, and the leaderboard
// ═══════════════════════════════════════════════════════════════════════

mod console;

use clap::{Parser, Subcommand};
use conquest_engine::strategy::NoInput;
use conquest_engine::types::StratKind;
use conquest_engine::{GameEngine, TournamentConfig};
use conquest_tournament::{run_batch, Database};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "conquest-runner", about = "Territorial conquest game lab")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game: interactive startup by default, headless when
    /// strategies are given
    Play {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Map file for headless play
        #[arg(short, long, default_value = "maps/world.map")]
        map: String,
        /// Computer strategies, e.g. "aggressive cheater"
        #[arg(long, num_args = 0..)]
        strategies: Vec<String>,
        /// Turn cap; the game is a draw when it is reached
        #[arg(short, long, default_value_t = 50)]
        turns: u32,
    },
    /// Run an M maps x G games tournament and print the results table
    Tournament {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// 1..=5 map files; prompted for interactively when omitted
        #[arg(short, long, num_args = 0..=5)]
        maps: Vec<PathBuf>,
        /// 2..=4 computer strategies
        #[arg(short = 'p', long, num_args = 0..=4)]
        strategies: Vec<String>,
        /// Games per map (1..=5)
        #[arg(short, long)]
        games: Option<u32>,
        /// Max turns per game (10..=50)
        #[arg(short, long)]
        turns: Option<u32>,
    },
    /// Play many seeds of one matchup in parallel and store the results
    Batch {
        #[arg(short, long, default_value = "maps/world.map")]
        map: String,
        #[arg(short = 'p', long, num_args = 2..=4, default_values_t = vec!["aggressive".to_string(), "benevolent".to_string()])]
        strategies: Vec<String>,
        #[arg(short, long, default_value_t = 20)]
        games: u32,
        #[arg(short, long, default_value_t = 50)]
        turns: u32,
        #[arg(short, long, default_value = "results.db")]
        db: String,
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// Also print every result as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// Show the ELO leaderboard from a results database
    Leaderboard {
        #[arg(short, long, default_value = "results.db")]
        db: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seed,
            map,
            strategies,
            turns,
        } => cmd_play(seed, &map, &strategies, turns),
        Commands::Tournament {
            seed,
            maps,
            strategies,
            games,
            turns,
        } => cmd_tournament(seed, maps, &strategies, games, turns),
        Commands::Batch {
            map,
            strategies,
            games,
            turns,
            db,
            seed,
            json,
        } => cmd_batch(&map, &strategies, games, turns, &db, seed, json),
        Commands::Leaderboard { db } => cmd_leaderboard(&db),
    }
}

fn parse_strategies(names: &[String]) -> Result<Vec<StratKind>, String> {
    names
        .iter()
        .map(|n| n.parse::<StratKind>().map_err(|e| e.to_string()))
        .collect()
}

fn cmd_play(seed: u64, map: &str, strategies: &[String], turns: u32) {
    let mut engine = GameEngine::new(seed);

    if strategies.is_empty() {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut out = std::io::stdout();
        match console::startup(&mut engine, &mut input, &mut out) {
            Ok(true) => {}
            Ok(false) => {
                eprintln!("startup aborted");
                return;
            }
            Err(e) => {
                eprintln!("input error: {e}");
                return;
            }
        }
        let mut source = console::LineDirectives::new(input, out);
        match engine.main_game_loop(&mut source, Some(turns)) {
            Ok(winner) => println!("\nResult: {winner}"),
            Err(e) => eprintln!("game error: {e}"),
        }
        return;
    }

    let kinds = match parse_strategies(strategies) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let mut play = || -> Result<String, conquest_engine::EngineError> {
        engine.load_map_file(map)?;
        engine.validate_map()?;
        engine.add_strategy_players(&kinds)?;
        engine.game_start()?;
        engine.main_game_loop(&mut NoInput, Some(turns))
    };
    let outcome = play();
    match outcome {
        Ok(winner) => {
            println!("Result: {winner} after {} turns", engine.turns_played());
            for event in engine.log().events() {
                println!("  {event}");
            }
        }
        Err(e) => eprintln!("game error: {e}"),
    }
}

fn cmd_tournament(
    seed: u64,
    maps: Vec<PathBuf>,
    strategies: &[String],
    games: Option<u32>,
    turns: Option<u32>,
) {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    let config = if maps.is_empty() {
        match collect_config(&mut input, &mut out) {
            Ok(Some(config)) => config,
            Ok(None) => return,
            Err(e) => {
                eprintln!("input error: {e}");
                return;
            }
        }
    } else {
        let kinds = match parse_strategies(strategies) {
            Ok(k) => k,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        };
        TournamentConfig {
            maps,
            strategies: kinds,
            games_per_map: games.unwrap_or(1),
            turns_per_game: turns.unwrap_or(50),
        }
    };

    let mut engine = GameEngine::new(seed);
    match engine.play_tournament(&config) {
        Ok(report) => print!("{report}"),
        Err(e) => eprintln!("tournament error: {e}"),
    }
}

/// Interactive tournament setup. Each answer is asked again until it
/// fits its range.
fn collect_config(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> std::io::Result<Option<TournamentConfig>> {
    let maps = loop {
        write!(out, "map files (1-5, comma separated): ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let maps: Vec<PathBuf> = line
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        if (1..=5).contains(&maps.len()) {
            break maps;
        }
        writeln!(out, "try again")?;
    };
    let strategies = loop {
        write!(
            out,
            "strategies (2-4 of aggressive/benevolent/neutral/cheater, comma separated): "
        )?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let parsed: Result<Vec<StratKind>, _> = line
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect();
        match parsed {
            Ok(kinds)
                if (2..=4).contains(&kinds.len()) && !kinds.contains(&StratKind::Human) =>
            {
                break kinds;
            }
            _ => writeln!(out, "try again")?,
        }
    };
    let Some(games_per_map) = console::ask("games per map (1-5)", |g| (1..=5).contains(g), input, out)?
    else {
        return Ok(None);
    };
    let Some(turns_per_game) =
        console::ask("max turns per game (10-50)", |t| (10..=50).contains(t), input, out)?
    else {
        return Ok(None);
    };
    Ok(Some(TournamentConfig {
        maps,
        strategies,
        games_per_map,
        turns_per_game,
    }))
}

fn cmd_batch(
    map: &str,
    strategies: &[String],
    games: u32,
    turns: u32,
    db_path: &str,
    seed: u64,
    json: bool,
) {
    let kinds = match parse_strategies(strategies) {
        Ok(k) => k,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    println!("=== Batch: {games} games on {map} ===\n");

    let db = Database::new(db_path);
    let seeds: Vec<u64> = (0..games).map(|g| seed + g as u64 * 1000).collect();
    let results = run_batch(map, &kinds, &seeds, turns);

    let mut wins: HashMap<String, u32> = HashMap::new();
    let mut errors = 0u32;
    for result in &results {
        match result {
            Ok(result) => {
                *wins.entry(result.winner.clone()).or_insert(0) += 1;
                db.store_game(map, result);
                if json {
                    match serde_json::to_string(result) {
                        Ok(line) => println!("{line}"),
                        Err(e) => eprintln!("serialization error: {e}"),
                    }
                }
                if let Some(winner) = result
                    .standings
                    .iter()
                    .find(|s| s.name == result.winner)
                {
                    let winner_id = db.register_strategy(&winner.strategy.to_string());
                    let loser_ids: Vec<i64> = result
                        .standings
                        .iter()
                        .filter(|s| s.name != result.winner)
                        .map(|s| db.register_strategy(&s.strategy.to_string()))
                        .collect();
                    db.update_elo(winner_id, &loser_ids, 32.0);
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("game error: {e}");
            }
        }
    }

    println!("--- Summary ({games} games, {errors} errors) ---");
    let mut tally: Vec<_> = wins.iter().collect();
    tally.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (name, count) in tally {
        let pct = *count as f64 / games as f64 * 100.0;
        println!("  {name:<14}: {count:>4} wins ({pct:.1}%)");
    }
    println!("\nResults saved to: {db_path}");
    println!("Total games in DB: {}", db.game_count());
}

fn cmd_leaderboard(db_path: &str) {
    let db = Database::new(db_path);
    let board = db.leaderboard();
    if board.is_empty() {
        println!("No strategies found. Run some batches first.");
        return;
    }
    println!("=== Leaderboard ===\n");
    println!("{:<20} {:>8} {:>8} {:>8}", "Strategy", "ELO", "Games", "Wins");
    println!("{}", "-".repeat(48));
    for (name, elo, games, wins) in &board {
        println!("{name:<20} {elo:>8.1} {games:>8} {wins:>8}");
    }
}
