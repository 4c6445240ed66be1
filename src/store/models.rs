//! Record structs for the progression collections, shared by every backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate progression counters for one user. One row per user, created
/// lazily on the first XP-earning event and never deleted.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: i64,
    pub xp_total: i64,
    pub level: i32,
    pub title: String,
    pub streak_current: i32,
    pub streak_max: i32,
    pub last_study_date: Option<NaiveDate>,
    pub questions_answered: i32,
    pub questions_correct: i32,
    pub battles_played: i32,
    pub battles_perfect: i32,
}

impl UserStats {
    /// Fresh row for a user who has not earned XP yet, at the bottom of the
    /// given ladder.
    pub fn fresh(user_id: i64, level: i32, title: &str) -> Self {
        Self {
            user_id,
            xp_total: 0,
            level,
            title: title.to_string(),
            streak_current: 0,
            streak_max: 0,
            last_study_date: None,
            questions_answered: 0,
            questions_correct: 0,
            battles_played: 0,
            battles_perfect: 0,
        }
    }
}

/// One XP grant. Append-only; the audit trail, not the balance of record.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct XpHistoryEntry {
    pub user_id: i64,
    pub xp_gained: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct UserMeta {
    pub user_id: i64,
    pub daily_xp_goal: i64,
    pub daily_questions_goal: i32,
    pub active: bool,
}

/// Accumulators for one (user, calendar day). Created lazily for "today";
/// rows for past days are never rewritten.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct DailyProgress {
    pub user_id: i64,
    pub date: NaiveDate,
    pub xp_gained: i64,
    pub questions_answered: i32,
    pub questions_correct: i32,
    pub xp_goal_met: bool,
    pub questions_goal_met: bool,
}

/// One catalog entry. The catalog is static data, read-only to this crate;
/// `criterion_type` carries the platform's string codes and is resolved by
/// the evaluator.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: i32,
    pub code: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub xp_bonus: i64,
    pub criterion_type: String,
    pub criterion_value: i64,
    pub active: bool,
}

/// Unlock junction row; existence means unlocked.
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct UserAchievement {
    pub user_id: i64,
    pub achievement_id: i32,
    pub unlocked_at: DateTime<Utc>,
}
