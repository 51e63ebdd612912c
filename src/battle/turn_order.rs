//! Turn scheduler: who acts next
//!
//! The order is fixed at the start of each round from the living units.
//! Units that die mid-round are skipped; the next round is rebuilt from
//! whoever is still on the field.

use serde::{Deserialize, Serialize};

use crate::battle::field::Field;
use crate::core::config::TurnOrderPolicy;
use crate::core::types::UnitId;

/// Round-based turn queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnScheduler {
    policy: TurnOrderPolicy,
    order: Vec<UnitId>,
    cursor: usize,
    round: u32,
}

impl TurnScheduler {
    pub fn new(policy: TurnOrderPolicy) -> Self {
        Self {
            policy,
            order: Vec::new(),
            cursor: 0,
            round: 0,
        }
    }

    pub fn policy(&self) -> TurnOrderPolicy {
        self.policy
    }

    /// Current round, starting at 1 after the first `next_unit`
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Order of the current round (may include units that died since)
    pub fn order(&self) -> &[UnitId] {
        &self.order
    }

    /// Compute a round order from the field under the given policy
    pub fn compute_order(policy: TurnOrderPolicy, field: &Field) -> Vec<UnitId> {
        let mut units: Vec<_> = field.all_units();
        match policy {
            // `all_units` is in placement order and the sort is stable
            TurnOrderPolicy::SpeedDescending => {
                units.sort_by(|a, b| b.speed().cmp(&a.speed()))
            }
            TurnOrderPolicy::PlacementOrder => {}
        }
        units.into_iter().map(|u| u.id).collect()
    }

    /// Advance to the next living unit, starting a new round when needed
    ///
    /// Returns `None` only when no living unit is left.
    pub fn next_unit(&mut self, field: &Field) -> Option<UnitId> {
        loop {
            while self.cursor < self.order.len() {
                let id = self.order[self.cursor];
                self.cursor += 1;
                if field.get(id).is_some_and(|u| u.is_alive()) {
                    return Some(id);
                }
            }

            if !field.any_alive() {
                self.order.clear();
                self.cursor = 0;
                return None;
            }

            self.start_round(field);
        }
    }

    /// Drop the queue entirely; the next call starts a fresh round
    pub fn clear(&mut self) {
        self.order.clear();
        self.cursor = 0;
    }

    fn start_round(&mut self, field: &Field) {
        self.order = Self::compute_order(self.policy, field);
        self.cursor = 0;
        self.round += 1;
        tracing::debug!(round = self.round, units = self.order.len(), "New round");
    }
}
