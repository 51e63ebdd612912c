//! Battle setup files: who stands where when the battle starts
//!
//! ```json
//! {
//!   "players": [{"unit": "hero", "position": [1, 1]}],
//!   "enemies": [{"unit": "goblin", "position": [6, 1]}],
//!   "obstacles": [[4, 0]]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::battle::execution::Battle;
use crate::battle::field::Field;
use crate::core::config::BattleConfig;
use crate::core::error::SetupError;
use crate::core::types::{Position, Side};
use crate::data::roster::Roster;

/// One roster unit placed on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Roster id
    pub unit: String,
    pub position: Position,
    /// Display name override, for two copies of the same template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Placement {
    pub fn new(unit: impl Into<String>, position: Position) -> Self {
        Self {
            unit: unit.into(),
            position,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSetup {
    pub players: Vec<Placement>,
    pub enemies: Vec<Placement>,
    #[serde(default)]
    pub obstacles: Vec<Position>,
}

impl BattleSetup {
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SetupError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Spawn every placement and start the battle
    ///
    /// Fails on the first unknown unit or conflicting placement.
    pub fn build(&self, roster: &Roster, config: BattleConfig) -> Result<Battle, SetupError> {
        config.validate()?;
        let mut field = Field::with_obstacles(
            config.grid.width,
            config.grid.height,
            self.obstacles.iter().copied(),
        );

        let sides = [(Side::Player, &self.players), (Side::Enemy, &self.enemies)];
        for (side, placements) in sides {
            for placement in placements {
                let mut unit = roster.spawn(&placement.unit, side, placement.position)?;
                if let Some(name) = &placement.name {
                    unit.name = name.clone();
                }
                field.add_unit(unit).map_err(|source| SetupError::Placement {
                    unit: placement.unit.clone(),
                    source,
                })?;
            }
        }

        Ok(Battle::new(field, config))
    }
}
