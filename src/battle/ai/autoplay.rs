//! Applying AI decisions to a battle
//!
//! A rejected decision never aborts the battle: the unit passes instead.

use serde::{Deserialize, Serialize};

use crate::battle::ai::BattleAi;
use crate::battle::engine::{Action, ActionOutcome, BattleEngine};
use crate::battle::execution::Battle;
use crate::core::error::{BattleError, Result};
use crate::core::types::{Side, Turn, UnitId};

/// Summary of an AI vs AI battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoBattleResult {
    /// `None` if the turn cap was hit first
    pub winner: Option<Side>,
    pub turns: Turn,
    pub rounds: u32,
}

/// Let `ai` act for `unit`, passing if its choice is rejected
pub fn run_ai_turn(battle: &mut Battle, ai: &mut dyn BattleAi, unit: UnitId) -> Result<ActionOutcome> {
    let action = ai.decide(battle, unit);
    apply_with_fallback(battle, unit, action, ai.name())
}

fn apply_with_fallback(
    battle: &mut Battle,
    unit: UnitId,
    action: Action,
    source: &str,
) -> Result<ActionOutcome> {
    match battle.take_turn(unit, action.clone()) {
        Ok(outcome) => Ok(outcome),
        Err(BattleError::BattleAlreadyEnded) => Err(BattleError::BattleAlreadyEnded),
        Err(err) => {
            tracing::warn!(%unit, ?action, error = %err, ai = source, "Action rejected, passing");
            battle.pass_turn(unit)?;
            Ok(ActionOutcome::Passed)
        }
    }
}

/// Alternate `next_unit` and AI turns until a side wins or `max_turns` pass
pub fn run_to_completion(
    battle: &mut Battle,
    player_ai: &mut dyn BattleAi,
    enemy_ai: &mut dyn BattleAi,
    max_turns: Turn,
) -> Result<AutoBattleResult> {
    while battle.check_victory().is_none() && battle.turn() < max_turns {
        let Some(unit) = battle.next_unit()? else {
            break;
        };
        let owner = match battle.field().get(unit) {
            Some(u) => u.owner,
            None => continue,
        };
        let ai: &mut dyn BattleAi = match owner {
            Side::Player => &mut *player_ai,
            Side::Enemy => &mut *enemy_ai,
        };
        run_ai_turn(battle, ai, unit)?;
    }

    let result = AutoBattleResult {
        winner: battle.check_victory(),
        turns: battle.turn(),
        rounds: battle.round(),
    };
    tracing::info!(winner = ?result.winner, turns = result.turns, rounds = result.rounds, "Auto battle finished");
    Ok(result)
}

/// One simultaneous step: player commands in order, then every enemy acts
///
/// Commands for units that are gone are skipped; rejected commands are
/// logged by the battle and otherwise ignored.
pub fn real_time_step(
    battle: &mut Battle,
    commands: &[(UnitId, Action)],
    enemy_ai: &mut dyn BattleAi,
) -> Result<()> {
    if battle.is_over() {
        return Err(BattleError::BattleAlreadyEnded);
    }

    for (unit, action) in commands {
        if battle.is_over() {
            return Ok(());
        }
        if !battle.field().contains(*unit) {
            continue;
        }
        if let Err(err) = battle.take_turn(*unit, action.clone()) {
            tracing::debug!(%unit, error = %err, "Command rejected");
        }
    }

    let enemies: Vec<UnitId> = battle.field().units_of(Side::Enemy).map(|u| u.id).collect();
    for enemy in enemies {
        if battle.is_over() {
            break;
        }
        if !battle.field().contains(enemy) {
            continue;
        }
        let action = enemy_ai.decide(battle, enemy);
        apply_with_fallback(battle, enemy, action, enemy_ai.name())?;
    }

    Ok(())
}
