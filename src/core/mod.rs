pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, BattleConfig, TurnOrderPolicy};
pub use error::{BattleError, MoveRejection, Result, SetupError};
pub use types::{BattleId, Position, Side, Turn, UnitId};
