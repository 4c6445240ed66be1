//! Consecutive-study-day streak derivation.

use chrono::NaiveDate;

/// Current and best streak values carried on a user's stats row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakState {
    pub current: i32,
    pub max: i32,
}

/// Applies one XP-granting event dated `today` to the streak.
///
/// The three-way branch is deliberate and must stay three-way: a second
/// event on the same day leaves the streak untouched rather than resetting
/// it, while any gap of two days or more starts over at 1.
pub fn advance(last_study: Option<NaiveDate>, today: NaiveDate, prev: StreakState) -> StreakState {
    let yesterday = today.pred_opt();
    let current = match last_study {
        Some(date) if date == today => prev.current,
        Some(date) if Some(date) == yesterday => prev.current + 1,
        _ => 1,
    };
    StreakState {
        current,
        max: prev.max.max(current),
    }
}
