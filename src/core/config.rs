//! Battle configuration with documented defaults
//!
//! Every tunable number lives here. Loaded from TOML; any missing section
//! or field falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::battle::constants::{
    BASE_HOLD_TURNS, DEFAULT_ATTACK_DIVISOR, DEFAULT_DEFENSE_DIVISOR, DEFAULT_GRID_HEIGHT,
    DEFAULT_GRID_WIDTH, DEFAULT_MIN_DAMAGE, DEFAULT_POLL_INTERVAL_MS,
};
use crate::core::error::SetupError;
use crate::core::types::Position;

/// Grid dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns (x ranges over `0..width`)
    pub width: u32,
    /// Number of rows (y ranges over `0..height`)
    pub height: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
        }
    }
}

/// Damage formula parameters
///
/// `damage = max(min_damage, power + attack / attack_divisor - defense / defense_divisor)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// How many attack points make one extra point of damage
    pub attack_divisor: u32,
    /// How many defense points absorb one point of damage
    pub defense_divisor: u32,
    /// Floor for a landed hit
    pub min_damage: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_divisor: DEFAULT_ATTACK_DIVISOR,
            defense_divisor: DEFAULT_DEFENSE_DIVISOR,
            min_damage: DEFAULT_MIN_DAMAGE,
        }
    }
}

/// How the scheduler orders a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOrderPolicy {
    /// Fastest first, ties by placement order
    #[default]
    SpeedDescending,
    /// Placement order, speed ignored
    PlacementOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnOrderConfig {
    pub policy: TurnOrderPolicy,
}

/// Alternative win condition: hold the opposing base
///
/// Disabled unless both bases are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryConfig {
    /// Cell the player defends (enemy wins by holding it)
    pub player_base: Option<Position>,
    /// Cell the enemy defends (player wins by holding it)
    pub enemy_base: Option<Position>,
    /// Consecutive resolved actions a base must be held
    pub base_hold_turns: u32,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        Self {
            player_base: None,
            enemy_base: None,
            base_hold_turns: BASE_HOLD_TURNS,
        }
    }
}

impl VictoryConfig {
    pub fn bases(&self) -> Option<(Position, Position)> {
        self.player_base.zip(self.enemy_base)
    }
}

/// Victory watcher cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Complete battle configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub grid: GridConfig,
    pub combat: CombatConfig,
    pub turn_order: TurnOrderConfig,
    pub victory: VictoryConfig,
    pub watch: WatchConfig,
}

impl BattleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, SetupError> {
        let config: BattleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(SetupError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }

        if self.combat.attack_divisor == 0 || self.combat.defense_divisor == 0 {
            return Err(SetupError::InvalidConfig(
                "damage divisors must be positive".into(),
            ));
        }

        if self.watch.poll_interval_ms == 0 {
            return Err(SetupError::InvalidConfig(
                "poll_interval_ms must be positive".into(),
            ));
        }

        let in_grid = |pos: Position| {
            pos.x >= 0
                && pos.y >= 0
                && (pos.x as u32) < self.grid.width
                && (pos.y as u32) < self.grid.height
        };

        match (self.victory.player_base, self.victory.enemy_base) {
            (None, None) => {}
            (Some(player), Some(enemy)) => {
                if !in_grid(player) || !in_grid(enemy) {
                    return Err(SetupError::InvalidConfig(format!(
                        "bases {} and {} must lie inside the grid",
                        player, enemy
                    )));
                }
                if player == enemy {
                    return Err(SetupError::InvalidConfig(
                        "player and enemy bases must differ".into(),
                    ));
                }
                if self.victory.base_hold_turns == 0 {
                    return Err(SetupError::InvalidConfig(
                        "base_hold_turns must be positive".into(),
                    ));
                }
            }
            _ => {
                return Err(SetupError::InvalidConfig(
                    "player_base and enemy_base must be set together".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Load a battle config from a TOML file
pub fn load_config(path: &Path) -> Result<BattleConfig, SetupError> {
    let contents = fs::read_to_string(path)?;
    BattleConfig::from_toml_str(&contents)
}
