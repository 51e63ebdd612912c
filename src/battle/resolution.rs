//! Action resolution math: movement validation and damage
//!
//! Pure functions; `Battle` applies their results to the field.

use crate::battle::skills::Skill;
use crate::battle::units::Unit;
use crate::core::config::CombatConfig;
use crate::core::error::MoveRejection;
use crate::core::types::Position;

/// Accept only a single orthogonal step
pub fn validate_step(dx: i32, dy: i32) -> Result<(), MoveRejection> {
    match (dx, dy) {
        (-1, 0) | (1, 0) | (0, -1) | (0, 1) => Ok(()),
        _ => Err(MoveRejection::MalformedOffset),
    }
}

/// Damage a landed hit deals before it is applied to hp
pub fn calculate_damage(attacker: &Unit, target: &Unit, skill: &Skill, config: &CombatConfig) -> u32 {
    let bonus = attacker.stats.attack / config.attack_divisor.max(1);
    let mitigation = target.stats.defense / config.defense_divisor.max(1);
    skill
        .power
        .saturating_add(bonus)
        .saturating_sub(mitigation)
        .max(config.min_damage)
}

/// Result of one landed hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub damage: u32,
    pub remaining_hp: u32,
    pub defeated: bool,
}

/// Apply `damage` to `target`, flooring hp at zero
pub fn apply_hit(target: &mut Unit, damage: u32) -> HitResult {
    let dealt = target.take_damage(damage);
    HitResult {
        damage: dealt,
        remaining_hp: target.stats.hp,
        defeated: !target.is_alive(),
    }
}

/// One orthogonal step from `from` toward `to`, x axis first
pub fn step_toward(from: Position, to: Position) -> Option<(i32, i32)> {
    if from.x != to.x {
        Some(((to.x - from.x).signum(), 0))
    } else if from.y != to.y {
        Some((0, (to.y - from.y).signum()))
    } else {
        None
    }
}
