//! Battle system integration tests

use std::sync::Arc;

use grid_tactics::battle::ai::{real_time_step, NearestTargetAi};
use grid_tactics::battle::*;
use grid_tactics::core::config::{BattleConfig, TurnOrderPolicy};
use grid_tactics::core::error::{BattleError, MoveRejection};
use grid_tactics::core::types::{Position, Side, UnitId};

fn slash() -> Arc<Skill> {
    Arc::new(Skill::new("slash", "Slash", 10, 1))
}

fn fireball() -> Arc<Skill> {
    Arc::new(Skill::new("fireball", "Fireball", 8, 2))
}

/// Hero/Mage vs Goblin/Orc with plain stats (damage = skill power)
fn sample(goblin_at: (i32, i32), obstacles: Vec<Position>) -> Battle {
    let players = vec![
        Unit::new("Hero", Side::Player, Position::new(5, 2), Stats::new(30, 0, 0, 0, 5))
            .with_skill(slash()),
        Unit::new("Mage", Side::Player, Position::new(6, 1), Stats::new(20, 0, 0, 0, 7))
            .with_skill(fireball()),
    ];
    let enemies = vec![
        Unit::new("Goblin", Side::Enemy, goblin_at.into(), Stats::new(25, 0, 0, 0, 4))
            .with_skill(slash()),
        Unit::new("Orc", Side::Enemy, Position::new(0, 3), Stats::new(35, 0, 0, 0, 3))
            .with_skill(slash()),
    ];
    Battle::start(players, enemies, obstacles, BattleConfig::default()).unwrap()
}

fn id(battle: &Battle, name: &str) -> UnitId {
    battle.field().find_by_name(name).unwrap().id
}

#[test]
fn test_two_hits_decide_the_battle() {
    let skill = Arc::new(Skill::new("strike", "Strike", 15, 1));
    let mut battle = Battle::start(
        vec![Unit::new("Knight", Side::Player, Position::new(2, 1), Stats::new(50, 0, 10, 0, 5))
            .with_skill(skill.clone())],
        vec![Unit::new("Bandit", Side::Enemy, Position::new(3, 1), Stats::new(20, 0, 5, 0, 3))
            .with_skill(skill)],
        [],
        BattleConfig::default(),
    )
    .unwrap();
    let knight = id(&battle, "Knight");
    let bandit = id(&battle, "Bandit");

    let first = battle.attack(knight, bandit, "strike").unwrap();
    assert_eq!(first.hit.damage, 17);
    assert_eq!(battle.field().get(bandit).unwrap().hp(), 3);
    assert_eq!(battle.check_victory(), None);

    let second = battle.attack(knight, bandit, "strike").unwrap();
    assert_eq!(second.hit.remaining_hp, 0);
    assert!(second.hit.defeated);
    assert_eq!(battle.check_victory(), Some(Side::Player));
    assert!(battle.turn_logs().contains(&"Bandit was defeated"));
}

#[test]
fn test_diagonal_move_rejected() {
    let mut battle = sample((1, 2), vec![]);
    let hero = id(&battle, "Hero");

    let err = battle.move_unit(hero, 1, 1).unwrap_err();
    assert!(matches!(
        err,
        BattleError::InvalidMove { reason: MoveRejection::MalformedOffset, .. }
    ));
    assert_eq!(battle.field().get(hero).unwrap().position, Position::new(5, 2));
}

#[test]
fn test_out_of_range_attack_leaves_hp() {
    let mut battle = sample((2, 2), vec![]);
    let hero = id(&battle, "Hero");
    let goblin = id(&battle, "Goblin");

    let err = battle.attack(hero, goblin, "slash").unwrap_err();
    assert_eq!(
        err,
        BattleError::OutOfRange { target: goblin, distance: 3, range: 1 }
    );
    assert_eq!(battle.field().get(goblin).unwrap().hp(), 25);
    assert_eq!(battle.last_log(), Some("Hero missed Goblin"));
}

#[test]
fn test_actions_after_end_rejected() {
    let mut battle = sample((4, 2), vec![]);
    let hero = id(&battle, "Hero");
    let goblin = id(&battle, "Goblin");

    battle.end_battle(true).unwrap();
    assert_eq!(battle.check_victory(), Some(Side::Player));
    assert_eq!(battle.last_log(), Some("player wins!"));

    assert_eq!(battle.move_unit(hero, 0, 1), Err(BattleError::BattleAlreadyEnded));
    assert_eq!(
        battle.attack(hero, goblin, "slash"),
        Err(BattleError::BattleAlreadyEnded)
    );
    assert_eq!(battle.pass_turn(hero), Err(BattleError::BattleAlreadyEnded));
    assert_eq!(battle.surrender(hero), Err(BattleError::BattleAlreadyEnded));
    assert_eq!(battle.next_unit(), Err(BattleError::BattleAlreadyEnded));
    assert_eq!(battle.end_battle(false), Err(BattleError::BattleAlreadyEnded));
    assert_eq!(
        battle.take_turn(hero, Action::Pass),
        Err(BattleError::BattleAlreadyEnded)
    );
}

#[test]
fn test_turn_order_and_take_turn() {
    let mut battle = sample((4, 2), vec![]);
    let names: Vec<&str> = TurnScheduler::compute_order(TurnOrderPolicy::SpeedDescending, battle.field())
        .into_iter()
        .map(|id| battle.field().get(id).unwrap().name.as_str())
        .collect();
    assert_eq!(names, ["Mage", "Hero", "Goblin", "Orc"]);

    let mage = battle.next_unit().unwrap().unwrap();
    assert_eq!(mage, id(&battle, "Mage"));
    battle.take_turn(mage, Action::Pass).unwrap();
    assert_eq!(battle.last_log(), Some("Mage passed"));

    let hero = battle.next_unit().unwrap().unwrap();
    assert_eq!(hero, id(&battle, "Hero"));
    let goblin = id(&battle, "Goblin");
    let outcome = battle
        .take_turn(hero, Action::Attack { target: goblin, skill: None })
        .unwrap();
    assert!(matches!(outcome, ActionOutcome::Attacked(_)));
    assert_eq!(battle.field().get(goblin).unwrap().hp(), 15);

    // Goblin acts next, then Orc, then a new round starts with Mage
    assert_eq!(battle.next_unit().unwrap(), Some(goblin));
    assert_eq!(battle.next_unit().unwrap(), Some(id(&battle, "Orc")));
    assert_eq!(battle.next_unit().unwrap(), Some(mage));
    assert_eq!(battle.round(), 2);
}

#[test]
fn test_defeated_unit_skipped_in_order() {
    let mut battle = sample((4, 2), vec![]);
    let goblin = id(&battle, "Goblin");
    let hero = id(&battle, "Hero");

    let mage = battle.next_unit().unwrap().unwrap();
    battle.pass_turn(mage).unwrap();
    assert_eq!(battle.next_unit().unwrap(), Some(hero));
    battle.attack(hero, goblin, "slash").unwrap();
    battle.attack(hero, goblin, "slash").unwrap();
    battle.attack(hero, goblin, "slash").unwrap();

    assert_eq!(battle.graveyard()[0].name, "Goblin");
    assert_eq!(battle.next_unit().unwrap(), Some(id(&battle, "Orc")));
}

#[test]
fn test_defeated_unit_cannot_act_or_be_targeted() {
    let mut battle = sample((4, 2), vec![]);
    let goblin = id(&battle, "Goblin");
    let hero = id(&battle, "Hero");
    for _ in 0..3 {
        battle.attack(hero, goblin, "slash").unwrap();
    }
    assert!(battle.field().get(goblin).is_none());

    let turn = battle.turn();
    let logs = battle.turn_logs().len();
    let hero_hp = battle.field().get(hero).unwrap().hp();

    assert_eq!(battle.pass_turn(goblin), Err(BattleError::UnitNotFound(goblin)));
    assert_eq!(battle.move_unit(goblin, -1, 0), Err(BattleError::UnitNotFound(goblin)));
    assert_eq!(
        battle.attack(goblin, hero, "slash"),
        Err(BattleError::UnitNotFound(goblin))
    );
    assert_eq!(
        battle.attack(hero, goblin, "slash"),
        Err(BattleError::UnitNotFound(goblin))
    );
    assert_eq!(
        battle.take_turn(goblin, Action::Pass),
        Err(BattleError::UnitNotFound(goblin))
    );

    assert_eq!(battle.turn(), turn);
    assert_eq!(battle.turn_logs().len(), logs);
    assert_eq!(battle.field().get(hero).unwrap().hp(), hero_hp);
    assert_eq!(battle.check_victory(), None);
    assert_eq!(battle.graveyard().len(), 1);
}

#[test]
fn test_zero_hp_unit_rejected_at_start() {
    let result = Battle::start(
        vec![Unit::new("Hero", Side::Player, Position::new(5, 2), Stats::new(30, 0, 0, 0, 5))
            .with_skill(slash())],
        vec![Unit::new("Ghost", Side::Enemy, Position::new(1, 2), Stats::new(0, 0, 0, 0, 4))
            .with_skill(slash())],
        [],
        BattleConfig::default(),
    );
    assert!(matches!(result, Err(BattleError::NoHitPoints(ref name)) if name == "Ghost"));
}

#[test]
fn test_obstacles_and_movement_rules() {
    let mut battle = sample((1, 2), vec![Position::new(4, 2)]);
    let hero = id(&battle, "Hero");
    assert!(battle.field().is_blocked(Position::new(4, 2)));

    assert!(battle.move_unit(hero, 1, 1).is_err());
    assert_eq!(battle.last_log(), Some("Hero failed to move"));

    let err = battle.move_unit(hero, -1, 0).unwrap_err();
    assert!(matches!(
        err,
        BattleError::InvalidMove { reason: MoveRejection::Blocked, .. }
    ));
    assert_eq!(battle.field().get(hero).unwrap().position, Position::new(5, 2));

    battle.move_unit(hero, 1, 0).unwrap();
    assert_eq!(battle.field().get(hero).unwrap().position, Position::new(6, 2));
    assert_eq!(battle.last_log(), Some("Hero moved to (6, 2)"));
}

#[test]
fn test_placement_conflicts() {
    let blocked = Battle::start(
        vec![Unit::new("Hero", Side::Player, Position::new(4, 2), Stats::new(30, 0, 0, 0, 5))],
        vec![],
        [Position::new(4, 2)],
        BattleConfig::default(),
    );
    assert!(matches!(blocked, Err(BattleError::PositionOccupied(_))));

    let stacked = Battle::start(
        vec![Unit::new("Hero", Side::Player, Position::new(1, 1), Stats::new(30, 0, 0, 0, 5))],
        vec![Unit::new("Goblin", Side::Enemy, Position::new(1, 1), Stats::new(25, 0, 0, 0, 4))],
        [],
        BattleConfig::default(),
    );
    assert_eq!(stacked.unwrap_err(), BattleError::PositionOccupied(Position::new(1, 1)));

    let off_grid = Battle::start(
        vec![Unit::new("Hero", Side::Player, Position::new(-1, 0), Stats::new(30, 0, 0, 0, 5))],
        vec![],
        [],
        BattleConfig::default(),
    );
    assert!(matches!(off_grid, Err(BattleError::OutOfBounds(_))));
}

#[test]
fn test_take_turn_move_attack_pass_surrender() {
    let mut battle = sample((7, 2), vec![Position::new(4, 2)]);
    let hero = id(&battle, "Hero");
    let goblin = id(&battle, "Goblin");

    battle.take_turn(hero, Action::Move { dx: 1, dy: 0 }).unwrap();
    assert_eq!(battle.last_log(), Some("Hero moved to (6, 2)"));

    battle
        .take_turn(hero, Action::Attack { target: goblin, skill: Some("slash".into()) })
        .unwrap();
    assert_eq!(battle.field().get(goblin).unwrap().hp(), 15);
    assert_eq!(battle.last_log(), Some("Hero used Slash on Goblin for 10 damage"));

    battle.take_turn(hero, Action::Pass).unwrap();
    assert_eq!(battle.last_log(), Some("Hero passed"));

    battle.take_turn(hero, Action::Surrender).unwrap();
    assert_eq!(battle.check_victory(), Some(Side::Enemy));
    assert_eq!(battle.last_log(), Some("enemy wins!"));
    assert!(battle.turn_logs().contains(&"Hero surrendered"));
}

#[test]
fn test_attack_many_mixed_range() {
    let skill = Arc::new(Skill::new("slash", "Slash", 5, 1));
    let unit = |name: &str, side, x| {
        Unit::new(name, side, Position::new(x, 0), Stats::new(20, 0, 0, 0, 5)).with_skill(skill.clone())
    };
    let mut battle = Battle::start(
        vec![unit("Attacker", Side::Player, 0)],
        vec![unit("InRange", Side::Enemy, 1), unit("OutRange", Side::Enemy, 3)],
        [],
        BattleConfig::default(),
    )
    .unwrap();
    let attacker = id(&battle, "Attacker");
    let near = id(&battle, "InRange");
    let far = id(&battle, "OutRange");

    let results = battle.attack_many(attacker, &[near, far], "slash").unwrap();
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(BattleError::OutOfRange { .. })));
    assert_eq!(battle.field().get(near).unwrap().hp(), 15);
    assert_eq!(battle.field().get(far).unwrap().hp(), 20);
    assert!(battle.turn_logs().iter().any(|l| l.contains("missed OutRange")));
}

#[test]
fn test_real_time_combat() {
    let mut battle = Battle::start(
        vec![Unit::new("Hero", Side::Player, Position::new(5, 2), Stats::new(50, 0, 0, 0, 5))
            .with_skill(slash())],
        vec![
            Unit::new("Goblin", Side::Enemy, Position::new(4, 2), Stats::new(20, 0, 0, 0, 4))
                .with_skill(slash()),
            Unit::new("Orc", Side::Enemy, Position::new(5, 3), Stats::new(20, 0, 0, 0, 3))
                .with_skill(slash()),
        ],
        [],
        BattleConfig::default(),
    )
    .unwrap();
    let hero = id(&battle, "Hero");
    let goblin = id(&battle, "Goblin");
    let orc = id(&battle, "Orc");
    let mut ai = NearestTargetAi::new();
    let hit = |target| vec![(hero, Action::Attack { target, skill: None })];

    real_time_step(&mut battle, &hit(goblin), &mut ai).unwrap();
    assert_eq!(battle.field().get(goblin).unwrap().hp(), 10);
    assert_eq!(battle.field().get(hero).unwrap().hp(), 30);

    real_time_step(&mut battle, &hit(goblin), &mut ai).unwrap();
    assert!(!battle.field().contains(goblin));
    assert_eq!(battle.field().get(hero).unwrap().hp(), 20);

    real_time_step(&mut battle, &hit(orc), &mut ai).unwrap();
    assert_eq!(battle.field().get(orc).unwrap().hp(), 10);
    assert_eq!(battle.field().get(hero).unwrap().hp(), 10);

    real_time_step(&mut battle, &hit(orc), &mut ai).unwrap();
    assert_eq!(battle.status().winner, Some(Side::Player));
}

#[test]
fn test_status_reflects_field() {
    let battle = sample((1, 2), vec![]);
    let status = battle.status();
    assert_eq!(status.units.len(), 4);
    let hero = status.units.iter().find(|u| u.name == "Hero").unwrap();
    assert_eq!(hero.position, Position::new(5, 2));
    assert_eq!(hero.hp, 30);
    assert_eq!(status.phase, BattlePhase::InProgress);
}
