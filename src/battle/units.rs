//! Units: combatants placed on the field
//!
//! A unit carries its stats, owner and position plus shared handles to the
//! skills it can use. Its `UnitId` is assigned when it is placed.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::battle::skills::Skill;
use crate::core::types::{Position, Side, UnitId};

/// Combat stats (all non-negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl Stats {
    pub fn new(hp: u32, mp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            hp,
            mp,
            attack,
            defense,
            speed,
        }
    }
}

/// A combatant
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    /// Record id from the roster data
    pub key: String,
    pub name: String,
    pub image: Option<String>,
    pub owner: Side,
    pub position: Position,
    pub stats: Stats,
    /// Stats at battle start
    pub base_stats: Stats,
    pub skills: Vec<Arc<Skill>>,
}

impl Unit {
    /// Create an unplaced unit; the field assigns the real id on insertion
    pub fn new(name: impl Into<String>, owner: Side, position: Position, stats: Stats) -> Self {
        let name = name.into();
        Self {
            id: UnitId(0),
            key: name.to_lowercase(),
            name,
            image: None,
            owner,
            position,
            stats,
            base_stats: stats,
            skills: Vec::new(),
        }
    }

    pub fn with_skill(mut self, skill: Arc<Skill>) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    pub fn hp(&self) -> u32 {
        self.stats.hp
    }

    pub fn speed(&self) -> u32 {
        self.stats.speed
    }

    /// Manhattan distance to another unit
    pub fn distance_to(&self, other: &Unit) -> u32 {
        self.position.distance(&other.position)
    }

    pub fn skill(&self, id: &str) -> Option<&Arc<Skill>> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// First listed skill, used when no skill is chosen
    pub fn default_skill(&self) -> Option<&Arc<Skill>> {
        self.skills.first()
    }

    /// Reduce hp by `amount`, floored at zero; returns damage actually dealt
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.stats.hp);
        self.stats.hp -= dealt;
        dealt
    }
}
