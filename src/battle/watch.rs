//! Async victory watcher
//!
//! Polls a shared battle until a winner is decided. Read-only: the watcher
//! never advances turns or ends the battle itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::battle::engine::BattleEngine;
use crate::battle::execution::Battle;
use crate::core::types::Side;

/// Battle shared between the game loop and watchers
pub type SharedBattle = Arc<Mutex<Battle>>;

pub fn share(battle: Battle) -> SharedBattle {
    Arc::new(Mutex::new(battle))
}

#[derive(Debug, Clone)]
pub struct VictoryWatcher {
    battle: SharedBattle,
    poll_interval: Duration,
}

impl VictoryWatcher {
    /// Watcher using the battle's configured poll interval
    pub async fn new(battle: SharedBattle) -> Self {
        let ms = battle.lock().await.config().watch.poll_interval_ms;
        Self::with_interval(battle, Duration::from_millis(ms))
    }

    pub fn with_interval(battle: SharedBattle, poll_interval: Duration) -> Self {
        Self {
            battle,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Resolve once a side has won
    pub async fn wait(self) -> Side {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Some(winner) = self.battle.lock().await.check_victory() {
                tracing::info!(%winner, "Watcher saw victory");
                return winner;
            }
        }
    }

    /// Run `wait` on the tokio runtime
    pub fn spawn(self) -> JoinHandle<Side> {
        tokio::spawn(self.wait())
    }
}
