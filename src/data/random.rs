//! Random unit generation for filler squads
//!
//! Deterministic for a given seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::data::records::UnitRecord;

pub const HP_RANGE: (u32, u32) = (10, 100);
pub const MP_RANGE: (u32, u32) = (0, 100);
/// Shared by attack, defense and speed
pub const STAT_RANGE: (u32, u32) = (1, 50);

/// Seeded generator for `UnitRecord`s
pub struct RandomUnitGenerator {
    rng: ChaCha8Rng,
    /// Skill ids to draw the single skill from
    skill_pool: Vec<String>,
    counter: u32,
}

impl RandomUnitGenerator {
    pub fn new(seed: u64, skill_pool: Vec<String>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            skill_pool,
            counter: 0,
        }
    }

    fn roll(&mut self, (min, max): (u32, u32)) -> u32 {
        self.rng.gen_range(min..=max)
    }

    /// Next record; ids are `random_<n>` so they never collide with each other
    pub fn generate(&mut self) -> UnitRecord {
        self.counter += 1;
        let serial = self.rng.gen_range(1..=9999);
        let image = format!("images/units/mon_{:03}.gif", self.rng.gen_range(1..=50));

        UnitRecord {
            id: format!("random_{}", self.counter),
            name: format!("Unit{}", serial),
            image: Some(image),
            hp: self.roll(HP_RANGE),
            mp: self.roll(MP_RANGE),
            attack: self.roll(STAT_RANGE),
            defense: self.roll(STAT_RANGE),
            speed: self.roll(STAT_RANGE),
            skills: self.skill_pool.choose(&mut self.rng).cloned().into_iter().collect(),
        }
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<UnitRecord> {
        (0..count).map(|_| self.generate()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_units() {
        let pool = vec!["slash".to_string(), "fireball".to_string()];
        let a = RandomUnitGenerator::new(7, pool.clone()).generate_many(5);
        let b = RandomUnitGenerator::new(7, pool).generate_many(5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stats_within_ranges() {
        let mut gen = RandomUnitGenerator::new(42, vec!["slash".into()]);
        for unit in gen.generate_many(200) {
            assert!((10..=100).contains(&unit.hp));
            assert!(unit.mp <= 100);
            for stat in [unit.attack, unit.defense, unit.speed] {
                assert!((1..=50).contains(&stat));
            }
            assert_eq!(unit.skills, vec!["slash".to_string()]);
        }
    }

    #[test]
    fn test_ids_unique_and_empty_pool() {
        let units = RandomUnitGenerator::new(1, vec![]).generate_many(3);
        assert_eq!(units[0].id, "random_1");
        assert_eq!(units[2].id, "random_3");
        assert!(units.iter().all(|u| u.skills.is_empty()));
    }
}
