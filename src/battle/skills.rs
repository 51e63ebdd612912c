//! Skills: shared, immutable reference data
//!
//! Loaded once per battle into a `SkillLibrary`; units hold `Arc` handles so
//! no single unit owns a skill.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named action usable in an attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Base damage before stat modifiers
    pub power: u32,
    /// Manhattan reach
    pub range: u32,
    #[serde(default)]
    pub mp_cost: u32,
    #[serde(default)]
    pub attribute: String,
    #[serde(default)]
    pub effect: String,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, power: u32, range: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power,
            range,
            mp_cost: 0,
            attribute: String::new(),
            effect: String::new(),
        }
    }

    pub fn with_mp_cost(mut self, mp_cost: u32) -> Self {
        self.mp_cost = mp_cost;
        self
    }

    pub fn reaches(&self, distance: u32) -> bool {
        distance <= self.range
    }
}

/// Skill catalog keyed by id
#[derive(Debug, Clone, Default)]
pub struct SkillLibrary {
    skills: AHashMap<String, Arc<Skill>>,
}

impl SkillLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a skill, returning the previous entry with the same id
    pub fn insert(&mut self, skill: Skill) -> Option<Arc<Skill>> {
        self.skills.insert(skill.id.clone(), Arc::new(skill))
    }

    pub fn get(&self, id: &str) -> Option<Arc<Skill>> {
        self.skills.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skills.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Skill>> {
        self.skills.values()
    }
}

impl FromIterator<Skill> for SkillLibrary {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut library = Self::new();
        for skill in iter {
            library.insert(skill);
        }
        library
    }
}
