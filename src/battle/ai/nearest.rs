//! Nearest-target AI
//!
//! Attack the closest hostile unit when the first skill reaches it,
//! otherwise take one step toward it (x axis first, y if x is taken).

use crate::battle::ai::BattleAi;
use crate::battle::engine::{Action, BattleEngine};
use crate::battle::execution::Battle;
use crate::battle::resolution::step_toward;
use crate::battle::units::Unit;
use crate::core::types::UnitId;

#[derive(Debug, Clone, Default)]
pub struct NearestTargetAi;

impl NearestTargetAi {
    pub fn new() -> Self {
        Self
    }

    /// Closest hostile unit; ties go to the earliest placed
    pub fn nearest_target<'a>(battle: &'a Battle, unit: &Unit) -> Option<&'a Unit> {
        battle
            .field()
            .units_of(unit.owner.opponent())
            .min_by_key(|other| (unit.distance_to(other), other.id))
    }
}

impl BattleAi for NearestTargetAi {
    fn decide(&mut self, battle: &Battle, unit: UnitId) -> Action {
        let Some(actor) = battle.field().get(unit) else {
            return Action::Pass;
        };
        let Some(target) = Self::nearest_target(battle, actor) else {
            return Action::Pass;
        };
        let Some(skill) = actor.default_skill() else {
            return Action::Pass;
        };

        if skill.reaches(actor.distance_to(target)) && actor.stats.mp >= skill.mp_cost {
            return Action::Attack {
                target: target.id,
                skill: Some(skill.id.clone()),
            };
        }

        // Prefer the x step, but sidestep along y when the x cell is taken
        let dx = (target.position.x - actor.position.x).signum();
        let dy = (target.position.y - actor.position.y).signum();
        let free_step = [(dx, 0), (0, dy)]
            .into_iter()
            .filter(|&step| step != (0, 0))
            .find(|&(dx, dy)| battle.field().is_free(actor.position.offset(dx, dy)));

        match free_step.or_else(|| step_toward(actor.position, target.position)) {
            Some((dx, dy)) => Action::Move { dx, dy },
            None => Action::Pass,
        }
    }

    fn name(&self) -> &str {
        "nearest"
    }
}
