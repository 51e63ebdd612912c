//! Battle field: a bounded rectangular grid and the units standing on it
//!
//! At most one unit occupies a cell. Obstacle cells can never be occupied.

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;

use crate::battle::units::Unit;
use crate::core::error::{BattleError, Result};
use crate::core::types::{Position, Side, UnitId};

/// The grid and its living units
#[derive(Debug, Clone)]
pub struct Field {
    pub width: u32,
    pub height: u32,
    /// Keyed by id, so iteration follows placement order
    units: BTreeMap<UnitId, Unit>,
    occupancy: AHashMap<Position, UnitId>,
    obstacles: AHashSet<Position>,
    next_id: u32,
}

impl Field {
    /// Create an empty field
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            units: BTreeMap::new(),
            occupancy: AHashMap::new(),
            obstacles: AHashSet::new(),
            next_id: 1,
        }
    }

    /// Create a field with blocked cells (out-of-bounds obstacles are ignored)
    pub fn with_obstacles(
        width: u32,
        height: u32,
        obstacles: impl IntoIterator<Item = Position>,
    ) -> Self {
        let mut field = Self::new(width, height);
        for pos in obstacles {
            if field.in_bounds(pos) {
                field.obstacles.insert(pos);
            }
        }
        field
    }

    /// Check if coordinate is within field bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Position> {
        self.obstacles.iter()
    }

    /// In bounds, not blocked and empty
    pub fn is_free(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_blocked(pos) && !self.occupancy.contains_key(&pos)
    }

    /// Place a living unit, assigning its id
    pub fn add_unit(&mut self, mut unit: Unit) -> Result<UnitId> {
        if !unit.is_alive() {
            return Err(BattleError::NoHitPoints(unit.name));
        }
        let pos = unit.position;
        if !self.in_bounds(pos) {
            return Err(BattleError::OutOfBounds(pos));
        }
        if self.is_blocked(pos) || self.occupancy.contains_key(&pos) {
            return Err(BattleError::PositionOccupied(pos));
        }

        let id = UnitId(self.next_id);
        self.next_id += 1;
        unit.id = id;
        self.occupancy.insert(pos, id);
        self.units.insert(id, unit);
        Ok(id)
    }

    /// Relocate a unit to `to`
    pub fn move_unit(&mut self, id: UnitId, to: Position) -> Result<()> {
        if !self.in_bounds(to) {
            return Err(BattleError::OutOfBounds(to));
        }
        if self.is_blocked(to) || self.occupancy.contains_key(&to) {
            return Err(BattleError::PositionOccupied(to));
        }
        let unit = self.units.get_mut(&id).ok_or(BattleError::UnitNotFound(id))?;

        self.occupancy.remove(&unit.position);
        unit.position = to;
        self.occupancy.insert(to, id);
        Ok(())
    }

    /// Take a unit off the field
    pub fn remove_unit(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        self.occupancy.remove(&unit.position);
        Some(unit)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// Occupant of a cell; `None` if empty or out of bounds
    pub fn unit_at(&self, pos: Position) -> Option<&Unit> {
        self.occupancy.get(&pos).and_then(|id| self.units.get(id))
    }

    /// Every living unit in placement order
    pub fn all_units(&self) -> Vec<&Unit> {
        self.units.values().collect()
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.keys().copied()
    }

    pub fn units_of(&self, side: Side) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.owner == side)
    }

    pub fn count(&self, side: Side) -> usize {
        self.units_of(side).count()
    }

    pub fn any_alive(&self) -> bool {
        self.units.values().any(|u| u.is_alive())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Look up a unit by its display name (first match)
    pub fn find_by_name(&self, name: &str) -> Option<&Unit> {
        self.units.values().find(|u| u.name == name)
    }
}
