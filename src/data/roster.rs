//! Roster: validated unit templates plus the skill library
//!
//! Every skill a unit references must exist and ids must be unique, so a
//! bad data file fails here rather than mid-battle.

use ahash::AHashMap;
use std::path::Path;

use crate::battle::skills::{Skill, SkillLibrary};
use crate::battle::units::Unit;
use crate::core::error::SetupError;
use crate::core::types::{Position, Side};
use crate::data::records::{SkillsFile, UnitRecord, UnitsFile};

pub const UNITS_FILE: &str = "units.json";
pub const SKILLS_FILE: &str = "skills.json";

#[derive(Debug, Clone, Default)]
pub struct Roster {
    skills: SkillLibrary,
    /// Insertion order
    units: Vec<UnitRecord>,
    index: AHashMap<String, usize>,
}

impl Roster {
    /// Build from parsed records
    pub fn from_records(
        units: Vec<UnitRecord>,
        skills: impl IntoIterator<Item = Skill>,
    ) -> Result<Self, SetupError> {
        let mut library = SkillLibrary::new();
        for skill in skills {
            let id = skill.id.clone();
            if library.insert(skill).is_some() {
                return Err(SetupError::DuplicateId { kind: "skill", id });
            }
        }

        let mut roster = Self {
            skills: library,
            units: Vec::with_capacity(units.len()),
            index: AHashMap::new(),
        };
        for record in units {
            roster.add_unit(record)?;
        }
        Ok(roster)
    }

    /// Parse the two JSON documents
    pub fn from_json(units_json: &str, skills_json: &str) -> Result<Self, SetupError> {
        let units: UnitsFile = serde_json::from_str(units_json)?;
        let skills: SkillsFile = serde_json::from_str(skills_json)?;
        Self::from_records(units.units, skills.skills)
    }

    /// Load `units.json` and `skills.json` from a data directory
    pub fn load_dir(dir: &Path) -> Result<Self, SetupError> {
        let units = std::fs::read_to_string(dir.join(UNITS_FILE))?;
        let skills = std::fs::read_to_string(dir.join(SKILLS_FILE))?;
        let roster = Self::from_json(&units, &skills)?;
        tracing::info!(
            dir = %dir.display(),
            units = roster.units.len(),
            skills = roster.skills.len(),
            "Roster loaded"
        );
        Ok(roster)
    }

    /// Add a template, checking its id and skill references
    pub fn add_unit(&mut self, record: UnitRecord) -> Result<(), SetupError> {
        if self.index.contains_key(&record.id) {
            return Err(SetupError::DuplicateId {
                kind: "unit",
                id: record.id,
            });
        }
        if record.hp == 0 {
            return Err(SetupError::InvalidRecord {
                id: record.id,
                reason: "hp must be positive".into(),
            });
        }
        if let Some(missing) = record.skills.iter().find(|s| !self.skills.contains(s)) {
            return Err(SetupError::UnknownSkill {
                unit: record.id.clone(),
                skill: missing.clone(),
            });
        }
        self.index.insert(record.id.clone(), self.units.len());
        self.units.push(record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&UnitRecord> {
        self.index.get(id).map(|&i| &self.units[i])
    }

    pub fn records(&self) -> &[UnitRecord] {
        &self.units
    }

    pub fn skills(&self) -> &SkillLibrary {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Instantiate a template for one side at a position
    pub fn spawn(&self, id: &str, owner: Side, position: Position) -> Result<Unit, SetupError> {
        let record = self
            .get(id)
            .ok_or_else(|| SetupError::UnknownUnit(id.to_string()))?;

        let mut unit = Unit::new(record.name.clone(), owner, position, record.stats())
            .with_key(record.id.clone());
        unit.image = record.image.clone();
        for skill_id in &record.skills {
            let skill = self.skills.get(skill_id).ok_or_else(|| SetupError::UnknownSkill {
                unit: record.id.clone(),
                skill: skill_id.clone(),
            })?;
            unit = unit.with_skill(skill);
        }
        Ok(unit)
    }
}
