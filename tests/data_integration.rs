//! Data loading integration tests against the bundled data directory

use std::path::PathBuf;

use grid_tactics::battle::ai::{run_to_completion, NearestTargetAi};
use grid_tactics::battle::BattleEngine;
use grid_tactics::core::config::{load_config, BattleConfig};
use grid_tactics::core::error::SetupError;
use grid_tactics::core::types::{Position, Side};
use grid_tactics::data::{BattleSetup, Placement, RandomUnitGenerator, Roster};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

#[test]
fn test_bundled_roster_loads() {
    let roster = Roster::load_dir(&data_dir()).unwrap();
    assert!(roster.len() >= 4);
    assert!(roster.skills().contains("slash"));

    let mage = roster.spawn("mage", Side::Player, Position::new(6, 1)).unwrap();
    assert_eq!(mage.name, "Mage");
    assert_eq!(mage.default_skill().unwrap().id, "fireball");
    assert_eq!(mage.default_skill().unwrap().mp_cost, 5);
}

#[test]
fn test_bundled_config_matches_defaults() {
    let config = load_config(&data_dir().join("battle.toml")).unwrap();
    assert_eq!(config, BattleConfig::default());
}

#[test]
fn test_skirmish_plays_to_a_winner() {
    let roster = Roster::load_dir(&data_dir()).unwrap();
    let setup = BattleSetup::load(&data_dir().join("battles/skirmish.json")).unwrap();
    let mut battle = setup.build(&roster, BattleConfig::default()).unwrap();

    assert_eq!(battle.field().count(Side::Player), 2);
    assert_eq!(battle.field().count(Side::Enemy), 2);

    let result = run_to_completion(
        &mut battle,
        &mut NearestTargetAi::new(),
        &mut NearestTargetAi::new(),
        500,
    )
    .unwrap();
    let winner = result.winner.expect("skirmish should be decided");
    battle.end_battle(winner == Side::Player).unwrap();
    assert!(battle.is_finished());
}

#[test]
fn test_random_squad_joins_roster() {
    let mut roster = Roster::load_dir(&data_dir()).unwrap();
    let before = roster.len();
    let mut generator = RandomUnitGenerator::new(99, vec!["slash".into()]);

    let mut setup = BattleSetup {
        players: vec![Placement::new("hero", Position::new(0, 0))],
        ..Default::default()
    };
    for (i, record) in generator.generate_many(3).into_iter().enumerate() {
        setup
            .enemies
            .push(Placement::new(record.id.clone(), Position::new(8, i as i32)));
        roster.add_unit(record).unwrap();
    }
    assert_eq!(roster.len(), before + 3);

    let battle = setup.build(&roster, BattleConfig::default()).unwrap();
    assert_eq!(battle.field().count(Side::Enemy), 3);
}

#[test]
fn test_missing_data_dir() {
    let err = Roster::load_dir(&data_dir().join("does-not-exist")).unwrap_err();
    assert!(matches!(err, SetupError::IoError(_)));
}

#[test]
fn test_invalid_config_rejected() {
    let err = BattleConfig::from_toml_str("[grid]\nwidth = 0\n").unwrap_err();
    assert!(matches!(err, SetupError::InvalidConfig(_)));

    let err = BattleConfig::from_toml_str("[victory]\nplayer_base = [1, 1]\n").unwrap_err();
    assert!(matches!(err, SetupError::InvalidConfig(_)));
}
