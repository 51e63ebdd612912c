//! Battle system - turn-based skirmishes on a small rectangular grid
//!
//! Two sides take turns in speed order. Each turn a unit moves one cell,
//! attacks with a skill, passes, or surrenders. A side wins when the other
//! has no units left (or, if bases are configured, by holding the enemy base).
//!
//! Layers:
//! - `field`: grid, occupancy and obstacles
//! - `turn_order`: who acts next
//! - `resolution`: pure move/damage rules
//! - `execution`: the `Battle` controller and its log
//! - `ai`: computer-controlled decisions
//! - `watch`: async victory polling

pub mod ai;
pub mod constants;
pub mod engine;
pub mod execution;
pub mod field;
pub mod resolution;
pub mod skills;
pub mod turn_order;
pub mod units;
pub mod watch;

// Re-exports for convenient access
pub use ai::{run_ai_turn, run_to_completion, AutoBattleResult, BattleAi, NearestTargetAi};
pub use constants::*;
pub use engine::{Action, ActionOutcome, AttackReport, BattleEngine};
pub use execution::{
    BaseControl, Battle, BattleEvent, BattleEventType, BattlePhase, BattleStatus, UnitStatus,
};
pub use field::Field;
pub use resolution::{calculate_damage, HitResult};
pub use skills::{Skill, SkillLibrary};
pub use turn_order::TurnScheduler;
pub use units::{Stats, Unit};
pub use watch::{SharedBattle, VictoryWatcher};
