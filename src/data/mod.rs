//! Upstream data: unit and skill records, battle setups, random units
//!
//! Everything here is read once before a battle starts. The battle core only
//! sees the resulting `Unit`s and `Skill`s.

pub mod random;
pub mod records;
pub mod roster;
pub mod setup;

pub use random::RandomUnitGenerator;
pub use records::{SkillsFile, UnitRecord, UnitsFile};
pub use roster::Roster;
pub use setup::{BattleSetup, Placement};
