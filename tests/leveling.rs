use progresso::{LevelDefinition, LevelTable};
use progresso::progression::levels::LevelTableError;

fn tier(level: i32, xp_threshold: i64, title: &str) -> LevelDefinition {
    LevelDefinition {
        level,
        xp_threshold,
        title: title.into(),
    }
}

#[test]
fn zero_xp_is_level_one() {
    let table = LevelTable::default();
    let info = table.level_for(0);
    assert_eq!(info.level, 1);
    assert_eq!(info.title, "Iniciante");
    assert_eq!(info.progress_percent, 0);
    assert_eq!(info.xp_to_next, 100);
    assert_eq!(info.next_title.as_deref(), Some("Aprendiz"));
}

#[test]
fn max_threshold_is_top_of_ladder() {
    let table = LevelTable::default();
    let info = table.level_for(5500);
    assert_eq!(info.level, 10);
    assert_eq!(info.title, "Lenda");
    assert_eq!(info.progress_percent, 100);
    assert_eq!(info.xp_to_next, 0);
    assert_eq!(info.next_title, None);

    // Anything beyond the last threshold stays at the top.
    let beyond = table.level_for(99_999);
    assert_eq!(beyond.level, 10);
    assert_eq!(beyond.progress_percent, 100);
}

#[test]
fn thresholds_are_inclusive() {
    let table = LevelTable::default();
    assert_eq!(table.level_for(99).level, 1);
    assert_eq!(table.level_for(100).level, 2);
    assert_eq!(table.level_for(101).level, 2);
}

#[test]
fn level_is_non_decreasing_and_matches_highest_tier() {
    let table = LevelTable::default();
    let mut previous = 0;
    for xp in 0..=6000 {
        let info = table.level_for(xp);
        assert!(info.level >= previous, "level dropped at {xp} xp");
        previous = info.level;

        let expected = table
            .tiers()
            .iter()
            .filter(|t| t.xp_threshold <= xp)
            .map(|t| t.level)
            .max()
            .unwrap();
        assert_eq!(info.level, expected, "wrong tier at {xp} xp");
    }
}

#[test]
fn progress_percent_rounds_within_tier() {
    let table = LevelTable::default();
    // Level 1 spans 0..100, so percent tracks xp directly.
    assert_eq!(table.level_for(49).progress_percent, 49);
    assert_eq!(table.level_for(50).progress_percent, 50);
    assert_eq!(table.level_for(1).progress_percent, 1);
}

#[test]
fn invalid_tables_are_rejected() {
    assert_eq!(LevelTable::new(vec![]).unwrap_err(), LevelTableError::Empty);
    assert_eq!(
        LevelTable::new(vec![tier(1, 50, "A")]).unwrap_err(),
        LevelTableError::BaseNotZero
    );
    assert_eq!(
        LevelTable::new(vec![tier(1, 0, "A"), tier(2, 0, "B")]).unwrap_err(),
        LevelTableError::NotIncreasing
    );
    assert_eq!(
        LevelTable::new(vec![tier(1, 0, "A"), tier(1, 10, "B")]).unwrap_err(),
        LevelTableError::NotIncreasing
    );
}

#[test]
fn custom_table_from_json() {
    let raw = r#"[
        {"level": 1, "xp_threshold": 0, "title": "Bronze"},
        {"level": 2, "xp_threshold": 40, "title": "Prata"},
        {"level": 3, "xp_threshold": 120, "title": "Ouro"}
    ]"#;
    let table = LevelTable::from_json(raw).unwrap();
    assert_eq!(table.tiers().len(), 3);
    let info = table.level_for(40);
    assert_eq!(info.level, 2);
    assert_eq!(info.title, "Prata");
    assert_eq!(info.xp_to_next, 80);

    assert!(matches!(
        LevelTable::from_json("not json").unwrap_err(),
        LevelTableError::Parse(_)
    ));
}
