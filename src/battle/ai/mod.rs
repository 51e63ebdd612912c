//! Battle AI: decides actions for units the player does not control
//!
//! Architecture: trait + runner
//! - `BattleAi` picks an `Action` from a read-only view of the battle
//! - `autoplay` applies decisions and falls back to passing on errors

pub mod autoplay;
pub mod nearest;

pub use autoplay::{real_time_step, run_ai_turn, run_to_completion, AutoBattleResult};
pub use nearest::NearestTargetAi;

use crate::battle::engine::Action;
use crate::battle::execution::Battle;
use crate::core::types::UnitId;

/// Trait for battle AI implementations
pub trait BattleAi {
    /// Choose an action for `unit`, which is about to act
    fn decide(&mut self, battle: &Battle, unit: UnitId) -> Action;

    /// Name for logs
    fn name(&self) -> &str;
}
