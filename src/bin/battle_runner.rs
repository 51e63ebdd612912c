//! Headless Battle Runner
//!
//! Runs an AI vs AI skirmish from the data directory and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use grid_tactics::battle::ai::{run_to_completion, NearestTargetAi};
use grid_tactics::battle::{BattleEngine, MAX_AUTO_TURNS};
use grid_tactics::core::config::{load_config, BattleConfig};
use grid_tactics::core::error::SetupError;
use grid_tactics::core::types::{Position, Side};
use grid_tactics::data::{BattleSetup, Placement, RandomUnitGenerator, Roster};
use serde::Serialize;

/// Headless Battle Runner - AI vs AI skirmishes
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run an AI vs AI skirmish and print the result")]
struct Args {
    /// Directory holding units.json and skills.json
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Setup file, relative to the data directory
    #[arg(long, default_value = "battles/skirmish.json")]
    setup: PathBuf,

    /// Optional TOML battle config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replace the enemy side with this many random units
    #[arg(long, default_value_t = 0)]
    random_enemies: usize,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum resolved actions before giving up (draw)
    #[arg(long, default_value_t = MAX_AUTO_TURNS)]
    max_turns: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the turn log to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Serialize)]
struct Survivor {
    name: String,
    owner: Side,
    hp: u32,
    position: Position,
}

/// JSON output structure
#[derive(Serialize)]
struct RunnerResult {
    winner: Option<Side>,
    turns: u64,
    rounds: u32,
    survivors: Vec<Survivor>,
    defeated: usize,
    log_entries: usize,
    seed: u64,
}

fn main() -> Result<(), SetupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BattleConfig::default(),
    };
    let mut roster = Roster::load_dir(&args.data_dir)?;
    let mut setup = BattleSetup::load(&args.data_dir.join(&args.setup))?;

    if args.random_enemies > 0 {
        let taken: Vec<Position> = setup
            .players
            .iter()
            .map(|p| p.position)
            .chain(setup.obstacles.iter().copied())
            .collect();
        setup.enemies = random_enemies(&mut roster, &config, &taken, args.random_enemies, seed)?;
    }

    let mut battle = setup.build(&roster, config)?;
    let result = run_to_completion(
        &mut battle,
        &mut NearestTargetAi::new(),
        &mut NearestTargetAi::new(),
        args.max_turns,
    )?;

    if let Some(winner) = result.winner {
        if let Err(err) = battle.end_battle(winner == Side::Player) {
            tracing::warn!(error = %err, "Could not end battle");
        }
    }

    if args.verbose {
        for line in battle.turn_logs() {
            eprintln!("  {}", line);
        }
        eprintln!();
    }

    let output = RunnerResult {
        winner: result.winner,
        turns: result.turns,
        rounds: result.rounds,
        survivors: battle
            .field()
            .all_units()
            .into_iter()
            .map(|u| Survivor {
                name: u.name.clone(),
                owner: u.owner,
                hp: u.hp(),
                position: u.position,
            })
            .collect(),
        defeated: battle.graveyard().len(),
        log_entries: battle.turn_logs().len(),
        seed,
    };

    match args.format.as_str() {
        "text" => print_text(&output),
        "json" => println!("{}", serde_json::to_string_pretty(&output)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Generate `count` random units and place them from the right edge inward
fn random_enemies(
    roster: &mut Roster,
    config: &BattleConfig,
    taken: &[Position],
    count: usize,
    seed: u64,
) -> Result<Vec<Placement>, SetupError> {
    let mut skill_pool: Vec<String> = roster.skills().iter().map(|s| s.id.clone()).collect();
    skill_pool.sort();

    let (width, height) = (config.grid.width as i32, config.grid.height as i32);
    let slots = (0..width)
        .rev()
        .flat_map(|x| (0..height).map(move |y| Position::new(x, y)))
        .filter(|pos| !taken.contains(pos));

    let mut generator = RandomUnitGenerator::new(seed, skill_pool);
    let mut placements = Vec::with_capacity(count);
    for (record, position) in generator.generate_many(count).into_iter().zip(slots) {
        placements.push(Placement::new(record.id.clone(), position));
        roster.add_unit(record)?;
    }
    if placements.len() < count {
        tracing::warn!(requested = count, placed = placements.len(), "Grid too small for random squad");
    }
    Ok(placements)
}

fn print_text(result: &RunnerResult) {
    println!("Battle Result");
    println!("=============");
    match result.winner {
        Some(side) => println!("Winner: {}", side),
        None => println!("Winner: none (turn limit)"),
    }
    println!("Turns: {} ({} rounds)", result.turns, result.rounds);
    println!("Defeated: {}", result.defeated);
    println!("Survivors:");
    for s in &result.survivors {
        println!("  {} [{}] hp={} at {}", s.name, s.owner, s.hp, s.position);
    }
    println!("Log entries: {}", result.log_entries);
    println!("Seed: {}", result.seed);
}
