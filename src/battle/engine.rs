//! The battle contract: every operation a caller can rely on
//!
//! `Battle` implements all of it; callers never need to probe for
//! capabilities before using one.

use serde::{Deserialize, Serialize};

use crate::battle::field::Field;
use crate::battle::resolution::HitResult;
use crate::core::error::{BattleError, Result};
use crate::core::types::{Position, Side, UnitId};

/// A single action a unit can take on its turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move { dx: i32, dy: i32 },
    /// `skill: None` uses the attacker's first skill
    Attack { target: UnitId, skill: Option<String> },
    Pass,
    Surrender,
}

/// Outcome of a landed attack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: UnitId,
    pub target: UnitId,
    pub skill: String,
    pub hit: HitResult,
}

/// What `take_turn` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved(Position),
    Attacked(AttackReport),
    Passed,
    Surrendered,
}

/// Operations the battle core guarantees
pub trait BattleEngine {
    fn field(&self) -> &Field;

    /// Next actor in turn order; `Ok(None)` once the field is empty or the
    /// battle is decided
    fn next_unit(&mut self) -> Result<Option<UnitId>>;

    fn pass_turn(&mut self, unit: UnitId) -> Result<()>;

    /// Single orthogonal step; returns the new position
    fn move_unit(&mut self, unit: UnitId, dx: i32, dy: i32) -> Result<Position>;

    fn attack(&mut self, attacker: UnitId, target: UnitId, skill: &str) -> Result<AttackReport>;

    /// Give up; the opposing side wins
    fn surrender(&mut self, unit: UnitId) -> Result<()>;

    /// Terminate the battle. `victory` is from the player's point of view.
    fn end_battle(&mut self, victory: bool) -> Result<()>;

    /// Winner once decided; no side effects
    fn check_victory(&self) -> Option<Side>;

    fn turn_logs(&self) -> Vec<&str>;

    /// True once actions are no longer accepted (decided or ended)
    fn is_over(&self) -> bool;

    /// Dispatch an `Action` to the matching operation
    fn take_turn(&mut self, unit: UnitId, action: Action) -> Result<ActionOutcome> {
        if self.is_over() {
            return Err(BattleError::BattleAlreadyEnded);
        }
        match action {
            Action::Move { dx, dy } => self.move_unit(unit, dx, dy).map(ActionOutcome::Moved),
            Action::Attack { target, skill } => {
                let skill = match skill {
                    Some(skill) => skill,
                    None => default_skill_id(self.field(), unit)?,
                };
                self.attack(unit, target, &skill).map(ActionOutcome::Attacked)
            }
            Action::Pass => self.pass_turn(unit).map(|_| ActionOutcome::Passed),
            Action::Surrender => self.surrender(unit).map(|_| ActionOutcome::Surrendered),
        }
    }
}

/// Id of a unit's first skill
pub fn default_skill_id(field: &Field, unit: UnitId) -> Result<String> {
    let unit_ref = field.get(unit).ok_or(BattleError::UnitNotFound(unit))?;
    unit_ref
        .default_skill()
        .map(|s| s.id.clone())
        .ok_or_else(|| BattleError::SkillNotFound {
            unit,
            skill: String::from("<default>"),
        })
}
