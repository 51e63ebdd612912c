//! Grid Tactics - Demo
//!
//! Runs the sample skirmish (Hero and Mage against Goblin and Orc) with the
//! nearest-target AI on both sides and prints the turn log.

use std::sync::Arc;

use grid_tactics::battle::ai::{run_to_completion, NearestTargetAi};
use grid_tactics::battle::watch::{share, VictoryWatcher};
use grid_tactics::battle::{Battle, BattleEngine, Skill, Stats, Unit, MAX_AUTO_TURNS};
use grid_tactics::core::config::BattleConfig;
use grid_tactics::core::error::Result;
use grid_tactics::core::types::{Position, Side};

fn sample_units() -> (Vec<Unit>, Vec<Unit>) {
    let slash = Arc::new(Skill::new("slash", "Slash", 10, 1));
    let fireball = Arc::new(Skill::new("fireball", "Fireball", 8, 2).with_mp_cost(5));

    let players = vec![
        Unit::new("Hero", Side::Player, Position::new(5, 2), Stats::new(30, 10, 8, 4, 5))
            .with_skill(slash.clone()),
        Unit::new("Mage", Side::Player, Position::new(6, 1), Stats::new(20, 30, 4, 2, 7))
            .with_skill(fireball),
    ];
    let enemies = vec![
        Unit::new("Goblin", Side::Enemy, Position::new(1, 2), Stats::new(25, 0, 6, 2, 4))
            .with_skill(slash.clone()),
        Unit::new("Orc", Side::Enemy, Position::new(0, 3), Stats::new(35, 0, 10, 4, 3))
            .with_skill(slash),
    ];
    (players, enemies)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Grid Tactics demo starting...");

    let (players, enemies) = sample_units();
    let shared = share(Battle::start(players, enemies, [], BattleConfig::default())?);
    let watcher = VictoryWatcher::new(shared.clone()).await.spawn();

    let result = {
        let mut battle = shared.lock().await;
        run_to_completion(
            &mut battle,
            &mut NearestTargetAi::new(),
            &mut NearestTargetAi::new(),
            MAX_AUTO_TURNS,
        )?
    };

    match result.winner {
        Some(_) => match watcher.await {
            Ok(winner) => tracing::info!(%winner, "Watcher notified"),
            Err(err) => tracing::warn!(error = %err, "Watcher task failed"),
        },
        None => watcher.abort(),
    }

    let mut battle = shared.lock().await;
    if let Some(winner) = result.winner {
        battle.end_battle(winner == Side::Player)?;
    }

    println!("\n=== GRID TACTICS ===");
    for line in battle.turn_logs() {
        println!("  {}", line);
    }
    println!();
    match result.winner {
        Some(winner) => println!("Winner: {} after {} turns", winner, result.turns),
        None => println!("No winner after {} turns", result.turns),
    }

    Ok(())
}
