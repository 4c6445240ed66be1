use std::sync::Arc;

use chrono::Utc;
use progresso::progression::daily;
use progresso::{AppState, MemoryStore, ProgressStore, ProgressionError};

fn engine() -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone());
    (store, state)
}

#[tokio::test]
async fn first_access_creates_defaults() {
    let (store, state) = engine();
    let meta = daily::get_or_create_meta(&state, 1).await.unwrap();
    assert_eq!(meta.daily_xp_goal, 50);
    assert_eq!(meta.daily_questions_goal, 10);
    assert!(meta.active);

    let row = daily::get_or_create_today(&state, 1).await.unwrap();
    assert_eq!(row.date, Utc::now().date_naive());
    assert_eq!(row.xp_gained, 0);
    assert_eq!(row.questions_answered, 0);
    assert!(!row.xp_goal_met);
    assert!(!row.questions_goal_met);

    assert!(store.get_meta(1).await.unwrap().is_some());
}

#[tokio::test]
async fn activity_accumulates_and_flips_met_flags() {
    let (_, state) = engine();
    let first = daily::record_activity(&state, 2, 30, 5, 4).await.unwrap();
    assert_eq!(first.xp_gained, 30);
    assert_eq!(first.questions_answered, 5);
    assert_eq!(first.questions_correct, 4);
    assert!(!first.xp_goal_met);
    assert!(!first.questions_goal_met);

    let second = daily::record_activity(&state, 2, 25, 6, 5).await.unwrap();
    assert_eq!(second.xp_gained, 55);
    assert_eq!(second.questions_answered, 11);
    assert_eq!(second.questions_correct, 9);
    assert!(second.xp_goal_met);
    assert!(second.questions_goal_met);
}

#[tokio::test]
async fn goal_exactly_reached_counts_as_met() {
    let (_, state) = engine();
    let row = daily::record_activity(&state, 3, 50, 10, 10).await.unwrap();
    assert!(row.xp_goal_met);
    assert!(row.questions_goal_met);
}

#[tokio::test]
async fn update_goal_overwrites_without_retro_grading() {
    let (store, state) = engine();
    let graded = daily::record_activity(&state, 4, 60, 2, 2).await.unwrap();
    assert!(graded.xp_goal_met);

    let meta = daily::update_goal(&state, 4, 1000, 100).await.unwrap();
    assert_eq!(meta.daily_xp_goal, 1000);
    assert_eq!(meta.daily_questions_goal, 100);
    assert!(meta.active);

    // The already-graded row keeps the flags it was written with.
    let today = Utc::now().date_naive();
    let row = store.get_daily(4, today).await.unwrap().unwrap();
    assert!(row.xp_goal_met);

    // The next activity grades against the new targets.
    let next = daily::record_activity(&state, 4, 10, 1, 1).await.unwrap();
    assert_eq!(next.xp_gained, 70);
    assert!(!next.xp_goal_met);
}

#[tokio::test]
async fn negative_targets_are_rejected() {
    let (_, state) = engine();
    let err = daily::update_goal(&state, 5, -1, 10).await.unwrap_err();
    assert!(matches!(err, ProgressionError::InvalidGoal));
    let err = daily::update_goal(&state, 5, 50, -3).await.unwrap_err();
    assert!(matches!(err, ProgressionError::InvalidGoal));
}
