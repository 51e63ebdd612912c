//! Serialized records for the upstream data files
//!
//! `units.json` holds `{"units": [...]}` and `skills.json` holds
//! `{"skills": [...]}`. Fields the battle core does not use (levels, drops,
//! rewards) are ignored on load.

use serde::{Deserialize, Serialize};

use crate::battle::skills::Skill;
use crate::battle::units::Stats;

/// A unit template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub hp: u32,
    #[serde(default)]
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    /// Skill ids, first one is the default attack
    #[serde(default)]
    pub skills: Vec<String>,
}

impl UnitRecord {
    pub fn stats(&self) -> Stats {
        Stats::new(self.hp, self.mp, self.attack, self.defense, self.speed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitsFile {
    pub units: Vec<UnitRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsFile {
    pub skills: Vec<Skill>,
}
