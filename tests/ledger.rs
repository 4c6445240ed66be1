use std::sync::Arc;

use chrono::{Days, Utc};
use progresso::progression::ledger;
use progresso::{AppState, MemoryStore, ProgressStore, ProgressionError};

fn engine() -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone());
    (store, state)
}

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let (_, state) = engine();
    let first = ledger::get_or_create_stats(&state, 1).await.unwrap();
    assert_eq!(first.xp_total, 0);
    assert_eq!(first.level, 1);
    assert_eq!(first.title, "Iniciante");
    assert_eq!(first.last_study_date, None);

    let second = ledger::get_or_create_stats(&state, 1).await.unwrap();
    assert_eq!(second.xp_total, first.xp_total);
    assert_eq!(second.level, first.level);
}

#[tokio::test]
async fn add_xp_is_additive_and_audited() {
    let (store, state) = engine();
    ledger::add_xp(&state, 1, 10, "estudo").await.unwrap();
    let outcome = ledger::add_xp(&state, 1, 15, "revisão").await.unwrap();

    assert_eq!(outcome.xp_gained, 15);
    assert_eq!(outcome.xp_total, 25);

    let stats = store.get_stats(1).await.unwrap().unwrap();
    assert_eq!(stats.xp_total, 25);
    assert_eq!(stats.level, state.levels.level_for(25).level);

    let history = store.history_for(1).await.unwrap();
    assert_eq!(history.len(), 2);
    // Most recent first.
    assert_eq!(history[0].reason, "revisão");
    assert_eq!(history[0].xp_gained, 15);
    assert_eq!(history[1].reason, "estudo");
}

#[tokio::test]
async fn leveled_up_flags_only_the_crossing_grant() {
    let (_, state) = engine();
    let before = ledger::add_xp(&state, 2, 99, "quase lá").await.unwrap();
    assert!(!before.leveled_up);
    assert_eq!(before.level.level, 1);

    let crossing = ledger::add_xp(&state, 2, 1, "subiu").await.unwrap();
    assert!(crossing.leveled_up);
    assert_eq!(crossing.level.level, 2);
    assert_eq!(crossing.level.title, "Aprendiz");

    let after = ledger::add_xp(&state, 2, 5, "seguindo").await.unwrap();
    assert!(!after.leveled_up);
}

#[tokio::test]
async fn streak_increments_from_yesterday() {
    let (store, state) = engine();
    ledger::get_or_create_stats(&state, 3).await.unwrap();

    let today = Utc::now().date_naive();
    let mut stats = store.get_stats(3).await.unwrap().unwrap();
    stats.last_study_date = today.checked_sub_days(Days::new(1));
    stats.streak_current = 3;
    stats.streak_max = 5;
    store.update_stats(&stats).await.unwrap();

    let outcome = ledger::add_xp(&state, 3, 10, "estudo").await.unwrap();
    assert_eq!(outcome.streak.current, 4);
    assert_eq!(outcome.streak.max, 5);

    // A second grant on the same day must not double-increment.
    let again = ledger::add_xp(&state, 3, 10, "mais estudo").await.unwrap();
    assert_eq!(again.streak.current, 4);
    assert_eq!(again.streak.max, 5);
}

#[tokio::test]
async fn streak_resets_after_a_gap() {
    let (store, state) = engine();
    ledger::get_or_create_stats(&state, 4).await.unwrap();

    let today = Utc::now().date_naive();
    let mut stats = store.get_stats(4).await.unwrap().unwrap();
    stats.last_study_date = today.checked_sub_days(Days::new(10));
    stats.streak_current = 7;
    stats.streak_max = 9;
    store.update_stats(&stats).await.unwrap();

    let outcome = ledger::add_xp(&state, 4, 10, "voltou").await.unwrap();
    assert_eq!(outcome.streak.current, 1);
    assert_eq!(outcome.streak.max, 9);

    let persisted = store.get_stats(4).await.unwrap().unwrap();
    assert_eq!(persisted.streak_current, 1);
    assert_eq!(persisted.streak_max, 9);
    assert_eq!(persisted.last_study_date, Some(today));
}

#[tokio::test]
async fn negative_total_is_rejected_not_clamped() {
    let (store, state) = engine();
    ledger::add_xp(&state, 5, 10, "estudo").await.unwrap();

    let err = ledger::add_xp(&state, 5, -25, "ajuste").await.unwrap_err();
    assert!(matches!(
        err,
        ProgressionError::NegativeXpTotal { user_id: 5, attempted: -15 }
    ));

    // The rejected delta left nothing behind.
    let stats = store.get_stats(5).await.unwrap().unwrap();
    assert_eq!(stats.xp_total, 10);
    assert_eq!(store.history_for(5).await.unwrap().len(), 1);

    // A negative delta that keeps the total at or above zero applies.
    let outcome = ledger::add_xp(&state, 5, -4, "ajuste").await.unwrap();
    assert_eq!(outcome.xp_total, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_grants_never_lose_increments() {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(store.clone()));

    let mut handles = Vec::new();
    for _ in 0..25 {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move {
            ledger::add_xp(&state, 6, 4, "estudo").await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = store.get_stats(6).await.unwrap().unwrap();
    assert_eq!(stats.xp_total, 100);
    assert_eq!(store.history_for(6).await.unwrap().len(), 25);
}
