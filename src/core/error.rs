use thiserror::Error;

use crate::core::types::{Position, UnitId};

/// Why a single-step move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// Offset was not a single orthogonal step
    MalformedOffset,
    OutOfBounds,
    /// Destination is an obstacle
    Blocked,
    Occupied,
}

/// Recoverable battle errors
///
/// None of these are fatal: callers log them and fall back to a safe action
/// such as passing the turn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("Position {0} is already occupied")]
    PositionOccupied(Position),

    #[error("Position {0} is outside the field")]
    OutOfBounds(Position),

    #[error("Invalid move for unit {unit} by ({dx}, {dy}): {reason:?}")]
    InvalidMove {
        unit: UnitId,
        dx: i32,
        dy: i32,
        reason: MoveRejection,
    },

    #[error("Target {target} is {distance} cells away, skill range is {range}")]
    OutOfRange {
        target: UnitId,
        distance: u32,
        range: u32,
    },

    #[error("Unit '{0}' has no hit points")]
    NoHitPoints(String),

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Unit {unit} does not know skill '{skill}'")]
    SkillNotFound { unit: UnitId, skill: String },

    #[error("Unit {unit} needs {required} mp, has {available}")]
    InsufficientMp {
        unit: UnitId,
        required: u32,
        available: u32,
    },

    #[error("No unit is currently acting")]
    NoActiveUnit,

    #[error("Battle has already ended")]
    BattleAlreadyEnded,
}

pub type Result<T> = std::result::Result<T, BattleError>;

/// Errors raised while building a battle from upstream data
///
/// Malformed data fails here, before the first turn.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown unit id: {0}")]
    UnknownUnit(String),

    #[error("Unit '{unit}' references unknown skill '{skill}'")]
    UnknownSkill { unit: String, skill: String },

    #[error("Invalid unit record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Battle error: {0}")]
    Battle(#[from] BattleError),

    #[error("Placement of '{unit}' failed: {source}")]
    Placement {
        unit: String,
        #[source]
        source: BattleError,
    },
}
