//! Battle system constants - all tunable defaults in one place
//!
//! `BattleConfig` starts from these; a TOML config can override any of them.

// Field
pub const DEFAULT_GRID_WIDTH: u32 = 9;
pub const DEFAULT_GRID_HEIGHT: u32 = 4;

// Damage: power + attack / ATTACK_DIVISOR - defense / DEFENSE_DIVISOR
pub const DEFAULT_ATTACK_DIVISOR: u32 = 4;
pub const DEFAULT_DEFENSE_DIVISOR: u32 = 2;
pub const DEFAULT_MIN_DAMAGE: u32 = 1;

// Base control
pub const BASE_HOLD_TURNS: u32 = 3;

// Victory polling cadence used by the UI
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// Auto-battle safety cap (actions, not rounds)
pub const MAX_AUTO_TURNS: u64 = 1000;
