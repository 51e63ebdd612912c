//! Grid Tactics - turn-based battle core for a grid tactics game
//!
//! Two sides fight on a small rectangular grid. Units act in speed order;
//! each turn a unit moves one cell, attacks with a skill, passes or
//! surrenders. The core owns the field, the turn order and the battle log.
//! Rendering and input live elsewhere.

pub mod battle;
pub mod core;
pub mod data;
