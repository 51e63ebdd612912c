//! Battle controller: lifecycle, actions and the turn log
//!
//! Each resolved action: validate -> mutate field -> log -> defeat/victory
//! checks -> base control. A side losing its last unit decides the battle on
//! the spot; `check_victory` only reports it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::battle::engine::{default_skill_id, AttackReport, BattleEngine};
use crate::battle::field::Field;
use crate::battle::resolution::{apply_hit, calculate_damage, validate_step};
use crate::battle::skills::Skill;
use crate::battle::turn_order::TurnScheduler;
use crate::battle::units::Unit;
use crate::core::config::BattleConfig;
use crate::core::error::{BattleError, MoveRejection, Result};
use crate::core::types::{BattleId, Position, Side, Turn, UnitId};

/// Battle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    InProgress,
    /// A side won; waiting for the caller to end the battle
    Decided(Side),
    /// Terminal
    Ended(Side),
}

impl BattlePhase {
    pub fn winner(&self) -> Option<Side> {
        match self {
            BattlePhase::InProgress => None,
            BattlePhase::Decided(side) | BattlePhase::Ended(side) => Some(*side),
        }
    }
}

/// Log entry for battle events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleEvent {
    pub turn: Turn,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    Moved { unit: UnitId, to: Position },
    MoveFailed { unit: UnitId },
    Attacked { attacker: UnitId, target: UnitId, damage: u32 },
    Missed { attacker: UnitId, target: UnitId },
    Passed { unit: UnitId },
    UnitDefeated { unit: UnitId },
    Surrendered { unit: UnitId },
    VictoryDecided { winner: Side },
    BattleEnded { winner: Side },
}

/// Per-turn UI context: whose turn it is and which skill is armed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub current: Option<UnitId>,
    pub pending_skill: Option<String>,
}

/// Consecutive resolved actions each side has held the opposing base
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseControl {
    pub player: u32,
    pub enemy: u32,
}

/// Serializable snapshot of a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitStatus {
    pub id: UnitId,
    pub name: String,
    pub owner: Side,
    pub position: Position,
    pub hp: u32,
    pub mp: u32,
}

/// Serializable snapshot of the whole battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleStatus {
    pub battle_id: BattleId,
    pub phase: BattlePhase,
    pub round: u32,
    pub turn: Turn,
    pub units: Vec<UnitStatus>,
    pub winner: Option<Side>,
}

/// Complete battle state
#[derive(Debug, Clone)]
pub struct Battle {
    id: BattleId,
    config: BattleConfig,
    field: Field,
    scheduler: TurnScheduler,
    phase: BattlePhase,
    turn: Turn,
    graveyard: Vec<Unit>,
    base_control: BaseControl,
    selection: Selection,
    log: Vec<BattleEvent>,
}

impl Battle {
    /// Wrap an already populated field
    pub fn new(field: Field, config: BattleConfig) -> Self {
        let mut battle = Self {
            id: BattleId::new(),
            scheduler: TurnScheduler::new(config.turn_order.policy),
            config,
            field,
            phase: BattlePhase::InProgress,
            turn: 0,
            graveyard: Vec::new(),
            base_control: BaseControl::default(),
            selection: Selection::default(),
            log: Vec::new(),
        };

        tracing::info!(
            battle = %battle.id,
            players = battle.field.count(Side::Player),
            enemies = battle.field.count(Side::Enemy),
            "Battle started"
        );
        battle.log_event(BattleEventType::BattleStarted, "Battle started".into());
        // A side may already be empty
        battle.check_elimination();
        battle
    }

    /// Place both sides on a fresh field and start the battle
    pub fn start(
        players: Vec<Unit>,
        enemies: Vec<Unit>,
        obstacles: impl IntoIterator<Item = Position>,
        config: BattleConfig,
    ) -> Result<Self> {
        let mut field = Field::with_obstacles(config.grid.width, config.grid.height, obstacles);
        for unit in players.into_iter().chain(enemies) {
            field.add_unit(unit)?;
        }
        Ok(Self::new(field, config))
    }

    pub fn id(&self) -> BattleId {
        self.id
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// True once `end_battle` has run
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Ended(_))
    }

    /// Resolved actions so far
    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn round(&self) -> u32 {
        self.scheduler.round()
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    /// Defeated units in order of death
    pub fn graveyard(&self) -> &[Unit] {
        &self.graveyard
    }

    pub fn base_control(&self) -> BaseControl {
        self.base_control
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.log
    }

    pub fn last_log(&self) -> Option<&str> {
        self.log.last().map(|e| e.description.as_str())
    }

    /// Unit whose turn it is, as handed out by `next_unit`
    pub fn current_unit(&self) -> Option<UnitId> {
        self.selection.current.filter(|id| self.field.contains(*id))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Arm a skill for the current unit's next attack
    pub fn select_skill(&mut self, skill: &str) -> Result<()> {
        self.require_active()?;
        let unit = self.current_unit().ok_or(BattleError::NoActiveUnit)?;
        self.living(unit)?
            .skill(skill)
            .ok_or_else(|| BattleError::SkillNotFound {
                unit,
                skill: skill.to_string(),
            })?;
        self.selection.pending_skill = Some(skill.to_string());
        Ok(())
    }

    pub fn pending_skill(&self) -> Option<&str> {
        self.selection.pending_skill.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selection.pending_skill = None;
    }

    /// Current unit attacks `target` with the armed skill (or its first one)
    pub fn attack_selected(&mut self, target: UnitId) -> Result<AttackReport> {
        self.require_active()?;
        let attacker = self.current_unit().ok_or(BattleError::NoActiveUnit)?;
        let skill = match self.selection.pending_skill.clone() {
            Some(skill) => skill,
            None => default_skill_id(&self.field, attacker)?,
        };
        let report = self.attack(attacker, target, &skill)?;
        self.clear_selection();
        Ok(report)
    }

    /// One skill against several targets
    ///
    /// Missing or out-of-range targets are logged as misses and skipped.
    /// The mp cost is paid once.
    pub fn attack_many(
        &mut self,
        attacker: UnitId,
        targets: &[UnitId],
        skill: &str,
    ) -> Result<Vec<Result<AttackReport>>> {
        self.require_active()?;
        let skill_ref = self.prepare_cast(attacker, skill)?;

        let mut results = Vec::with_capacity(targets.len());
        for &target in targets {
            let result = match self.field.get(target) {
                None => {
                    self.log_miss_by_id(attacker, target);
                    Err(BattleError::UnitNotFound(target))
                }
                Some(_) => self.resolve_hit(attacker, target, &skill_ref),
            };
            results.push(result);
        }

        self.after_action();
        Ok(results)
    }

    /// Serializable snapshot of hp and positions plus the winner
    pub fn status(&self) -> BattleStatus {
        BattleStatus {
            battle_id: self.id,
            phase: self.phase,
            round: self.scheduler.round(),
            turn: self.turn,
            units: self
                .field
                .all_units()
                .into_iter()
                .map(|u| UnitStatus {
                    id: u.id,
                    name: u.name.clone(),
                    owner: u.owner,
                    position: u.position,
                    hp: u.stats.hp,
                    mp: u.stats.mp,
                })
                .collect(),
            winner: self.check_victory(),
        }
    }

    // === Internal helpers ===

    fn require_active(&self) -> Result<()> {
        match self.phase {
            BattlePhase::InProgress => Ok(()),
            _ => Err(BattleError::BattleAlreadyEnded),
        }
    }

    fn living(&self, id: UnitId) -> Result<&Unit> {
        self.field
            .get(id)
            .filter(|u| u.is_alive())
            .ok_or(BattleError::UnitNotFound(id))
    }

    fn log_event(&mut self, event_type: BattleEventType, description: String) {
        tracing::debug!(turn = self.turn, "{}", description);
        self.log.push(BattleEvent {
            turn: self.turn,
            event_type,
            description,
        });
    }

    fn log_miss_by_id(&mut self, attacker: UnitId, target: UnitId) {
        let attacker_name = self.unit_name(attacker);
        let target_name = self.unit_name(target);
        self.log_event(
            BattleEventType::Missed { attacker, target },
            format!("{} missed {}", attacker_name, target_name),
        );
    }

    /// Name of a living or defeated unit
    fn unit_name(&self, id: UnitId) -> String {
        self.field
            .get(id)
            .or_else(|| self.graveyard.iter().find(|u| u.id == id))
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Validate the caster and pay the mp cost
    fn prepare_cast(&mut self, attacker: UnitId, skill: &str) -> Result<Arc<Skill>> {
        let caster = self.living(attacker)?;
        let skill_ref = caster
            .skill(skill)
            .cloned()
            .ok_or_else(|| BattleError::SkillNotFound {
                unit: attacker,
                skill: skill.to_string(),
            })?;
        if caster.stats.mp < skill_ref.mp_cost {
            return Err(BattleError::InsufficientMp {
                unit: attacker,
                required: skill_ref.mp_cost,
                available: caster.stats.mp,
            });
        }
        if let Some(caster) = self.field.get_mut(attacker) {
            caster.stats.mp -= skill_ref.mp_cost;
        }
        Ok(skill_ref)
    }

    /// Range check, damage and defeat handling for one target
    fn resolve_hit(
        &mut self,
        attacker: UnitId,
        target: UnitId,
        skill: &Skill,
    ) -> Result<AttackReport> {
        let (attacker_ref, target_ref) = match (self.field.get(attacker), self.field.get(target)) {
            (Some(a), Some(t)) => (a, t),
            (None, _) => return Err(BattleError::UnitNotFound(attacker)),
            (_, None) => return Err(BattleError::UnitNotFound(target)),
        };

        let distance = attacker_ref.distance_to(target_ref);
        if !skill.reaches(distance) {
            tracing::debug!(%attacker, %target, distance, range = skill.range, "Out of range");
            self.log_miss_by_id(attacker, target);
            return Err(BattleError::OutOfRange {
                target,
                distance,
                range: skill.range,
            });
        }

        let damage = calculate_damage(attacker_ref, target_ref, skill, &self.config.combat);
        let attacker_name = attacker_ref.name.clone();
        let target_name = target_ref.name.clone();

        let hit = match self.field.get_mut(target) {
            Some(target_mut) => apply_hit(target_mut, damage),
            None => return Err(BattleError::UnitNotFound(target)),
        };

        self.log_event(
            BattleEventType::Attacked {
                attacker,
                target,
                damage: hit.damage,
            },
            format!(
                "{} used {} on {} for {} damage",
                attacker_name, skill.name, target_name, hit.damage
            ),
        );

        if hit.defeated {
            self.defeat(target);
        }

        Ok(AttackReport {
            attacker,
            target,
            skill: skill.id.clone(),
            hit,
        })
    }

    /// Remove a dead unit and check whether its side is wiped out
    fn defeat(&mut self, id: UnitId) {
        if let Some(unit) = self.field.remove_unit(id) {
            tracing::info!(unit = %unit.name, owner = %unit.owner, "Unit defeated");
            self.log_event(
                BattleEventType::UnitDefeated { unit: id },
                format!("{} was defeated", unit.name),
            );
            self.graveyard.push(unit);
            self.check_elimination();
        }
    }

    fn check_elimination(&mut self) {
        if self.phase != BattlePhase::InProgress {
            return;
        }
        if self.field.count(Side::Enemy) == 0 {
            self.decide(Side::Player);
        } else if self.field.count(Side::Player) == 0 {
            self.decide(Side::Enemy);
        }
    }

    fn decide(&mut self, winner: Side) {
        tracing::info!(battle = %self.id, %winner, turn = self.turn, "Victory decided");
        self.phase = BattlePhase::Decided(winner);
        self.scheduler.clear();
        self.selection = Selection::default();
        self.log_event(
            BattleEventType::VictoryDecided { winner },
            format!("{} wins!", winner),
        );
    }

    /// Bookkeeping after every resolved action
    fn after_action(&mut self) {
        self.turn += 1;
        self.update_base_control();
    }

    fn update_base_control(&mut self) {
        let Some((player_base, enemy_base)) = self.config.victory.bases() else {
            return;
        };
        if self.phase != BattlePhase::InProgress {
            return;
        }

        let holds = |pos: Position, side: Side| {
            self.field
                .unit_at(pos)
                .is_some_and(|u| u.owner == side)
        };
        let player_holds = holds(enemy_base, Side::Player);
        let enemy_holds = holds(player_base, Side::Enemy);

        self.base_control.player = if player_holds { self.base_control.player + 1 } else { 0 };
        self.base_control.enemy = if enemy_holds { self.base_control.enemy + 1 } else { 0 };

        let needed = self.config.victory.base_hold_turns;
        if self.base_control.player >= needed {
            self.decide(Side::Player);
        } else if self.base_control.enemy >= needed {
            self.decide(Side::Enemy);
        }
    }
}

impl BattleEngine for Battle {
    fn field(&self) -> &Field {
        &self.field
    }

    fn next_unit(&mut self) -> Result<Option<UnitId>> {
        match self.phase {
            BattlePhase::Ended(_) => Err(BattleError::BattleAlreadyEnded),
            BattlePhase::Decided(_) => Ok(None),
            BattlePhase::InProgress => {
                let next = self.scheduler.next_unit(&self.field);
                self.selection = Selection {
                    current: next,
                    pending_skill: None,
                };
                Ok(next)
            }
        }
    }

    fn pass_turn(&mut self, unit: UnitId) -> Result<()> {
        self.require_active()?;
        let name = self.living(unit)?.name.clone();
        self.log_event(BattleEventType::Passed { unit }, format!("{} passed", name));
        self.after_action();
        Ok(())
    }

    fn move_unit(&mut self, unit: UnitId, dx: i32, dy: i32) -> Result<Position> {
        self.require_active()?;
        let mover = self.living(unit)?;
        let name = mover.name.clone();
        let from = mover.position;

        let rejection = validate_step(dx, dy).err().or_else(|| {
            let dest = from.offset(dx, dy);
            if !self.field.in_bounds(dest) {
                Some(MoveRejection::OutOfBounds)
            } else if self.field.is_blocked(dest) {
                Some(MoveRejection::Blocked)
            } else if self.field.unit_at(dest).is_some() {
                Some(MoveRejection::Occupied)
            } else {
                None
            }
        });

        if let Some(reason) = rejection {
            tracing::debug!(%unit, dx, dy, ?reason, "Move rejected");
            self.log_event(
                BattleEventType::MoveFailed { unit },
                format!("{} failed to move", name),
            );
            return Err(BattleError::InvalidMove {
                unit,
                dx,
                dy,
                reason,
            });
        }

        let dest = from.offset(dx, dy);
        self.field.move_unit(unit, dest)?;
        self.log_event(
            BattleEventType::Moved { unit, to: dest },
            format!("{} moved to {}", name, dest),
        );
        self.after_action();
        Ok(dest)
    }

    fn attack(&mut self, attacker: UnitId, target: UnitId, skill: &str) -> Result<AttackReport> {
        self.require_active()?;
        self.living(attacker)?;
        self.living(target)?;

        // Range is checked before mp is paid, so a miss costs nothing
        let skill_ref = self
            .living(attacker)?
            .skill(skill)
            .cloned()
            .ok_or_else(|| BattleError::SkillNotFound {
                unit: attacker,
                skill: skill.to_string(),
            })?;
        let distance = self.living(attacker)?.distance_to(self.living(target)?);
        if !skill_ref.reaches(distance) {
            self.log_miss_by_id(attacker, target);
            return Err(BattleError::OutOfRange {
                target,
                distance,
                range: skill_ref.range,
            });
        }

        self.prepare_cast(attacker, skill)?;
        let report = self.resolve_hit(attacker, target, &skill_ref)?;
        self.after_action();
        Ok(report)
    }

    fn surrender(&mut self, unit: UnitId) -> Result<()> {
        self.require_active()?;
        let surrendering = self.living(unit)?;
        let (name, owner) = (surrendering.name.clone(), surrendering.owner);
        self.log_event(
            BattleEventType::Surrendered { unit },
            format!("{} surrendered", name),
        );
        self.end_battle(owner == Side::Enemy)
    }

    fn end_battle(&mut self, victory: bool) -> Result<()> {
        let winner = if victory { Side::Player } else { Side::Enemy };
        match self.phase {
            BattlePhase::Ended(_) => return Err(BattleError::BattleAlreadyEnded),
            BattlePhase::Decided(decided) if decided == winner => {}
            _ => {
                self.log_event(
                    BattleEventType::BattleEnded { winner },
                    format!("{} wins!", winner),
                );
            }
        }

        tracing::info!(battle = %self.id, %winner, turn = self.turn, "Battle ended");
        self.phase = BattlePhase::Ended(winner);
        self.scheduler.clear();
        self.selection = Selection::default();
        Ok(())
    }

    fn check_victory(&self) -> Option<Side> {
        self.phase.winner()
    }

    fn turn_logs(&self) -> Vec<&str> {
        self.log.iter().map(|e| e.description.as_str()).collect()
    }

    fn is_over(&self) -> bool {
        self.phase != BattlePhase::InProgress
    }
}
