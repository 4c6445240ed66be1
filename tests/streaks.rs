use chrono::NaiveDate;
use progresso::StreakState;
use progresso::progression::streak::advance;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn first_event_starts_at_one() {
    let today = date(2026, 8, 6);
    let state = advance(None, today, StreakState { current: 0, max: 0 });
    assert_eq!(state, StreakState { current: 1, max: 1 });
}

#[test]
fn yesterday_increments() {
    let today = date(2026, 8, 6);
    let state = advance(
        Some(date(2026, 8, 5)),
        today,
        StreakState { current: 3, max: 5 },
    );
    assert_eq!(state, StreakState { current: 4, max: 5 });
}

#[test]
fn same_day_event_leaves_streak_untouched() {
    let today = date(2026, 8, 6);
    let state = advance(
        Some(today),
        today,
        StreakState { current: 3, max: 5 },
    );
    assert_eq!(state, StreakState { current: 3, max: 5 });
}

#[test]
fn gap_resets_to_one() {
    let today = date(2026, 8, 6);
    let state = advance(
        Some(date(2026, 7, 27)),
        today,
        StreakState { current: 7, max: 9 },
    );
    assert_eq!(state, StreakState { current: 1, max: 9 });
}

#[test]
fn month_boundary_still_counts_as_yesterday() {
    let today = date(2026, 8, 1);
    let state = advance(
        Some(date(2026, 7, 31)),
        today,
        StreakState { current: 10, max: 10 },
    );
    assert_eq!(state, StreakState { current: 11, max: 11 });
}

#[test]
fn max_never_decreases() {
    let today = date(2026, 8, 6);
    // Reset keeps the best run.
    let reset = advance(
        Some(date(2026, 8, 1)),
        today,
        StreakState { current: 5, max: 5 },
    );
    assert_eq!(reset.max, 5);
    // A new best run raises it.
    let raised = advance(
        Some(date(2026, 8, 5)),
        today,
        StreakState { current: 5, max: 5 },
    );
    assert_eq!(raised, StreakState { current: 6, max: 6 });
}
