//! Persistence collaborator for the progression core.
//!
//! This module acts as the hub for all storage-related logic: the record
//! models, the abstract `ProgressStore` trait every backend implements, and
//! the two shipped backends (in-memory for tests and fixtures, PostgreSQL
//! for deployments).

pub mod memory;
pub mod models;
pub mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use self::models::{AchievementDefinition, DailyProgress, UserAchievement, UserMeta, UserStats, XpHistoryEntry};

/// Failures surfaced by a storage backend. Absence of a lazily created row
/// is not an error; reads return `Option` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An insert targeted a key that already holds a row.
    #[error("record already exists")]
    Duplicate,
    /// An update targeted a row that does not exist.
    #[error("record not found")]
    NotFound,
    /// The backend failed to execute the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Typed CRUD over the progression collections.
///
/// One collection per record model, keyed as described on the model structs.
/// Implementations must be safe to share across tasks; per-user write
/// serialization is handled above this trait by `AppState`.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    // --- user stats ---

    async fn get_stats(&self, user_id: i64) -> Result<Option<UserStats>, StoreError>;

    /// Inserts a fresh stats row. `Err(Duplicate)` when the user already has
    /// one, so callers can fall back to the winner of a create race.
    async fn insert_stats(&self, stats: &UserStats) -> Result<(), StoreError>;

    /// Overwrites the user's stats row with `stats`.
    async fn update_stats(&self, stats: &UserStats) -> Result<(), StoreError>;

    /// Atomically bumps `questions_answered`, and `questions_correct` when
    /// `correct`, without touching the XP fields.
    async fn increment_question_counters(&self, user_id: i64, correct: bool) -> Result<(), StoreError>;

    /// Atomically bumps `battles_played`, and `battles_perfect` when
    /// `perfect`, without touching the XP fields.
    async fn increment_battle_counters(&self, user_id: i64, perfect: bool) -> Result<(), StoreError>;

    // --- xp history ---

    /// Appends one immutable history entry.
    async fn insert_history(&self, entry: &XpHistoryEntry) -> Result<(), StoreError>;

    /// All history entries for the user, most recent first.
    async fn history_for(&self, user_id: i64) -> Result<Vec<XpHistoryEntry>, StoreError>;

    // --- daily goal config ---

    async fn get_meta(&self, user_id: i64) -> Result<Option<UserMeta>, StoreError>;

    async fn upsert_meta(&self, meta: &UserMeta) -> Result<(), StoreError>;

    // --- daily progress ---

    async fn get_daily(&self, user_id: i64, date: NaiveDate) -> Result<Option<DailyProgress>, StoreError>;

    async fn upsert_daily(&self, progress: &DailyProgress) -> Result<(), StoreError>;

    // --- achievements ---

    /// Active catalog entries, in catalog order.
    async fn active_achievements(&self) -> Result<Vec<AchievementDefinition>, StoreError>;

    /// Ids of achievements the user has already unlocked.
    async fn unlocked_achievement_ids(&self, user_id: i64) -> Result<HashSet<i32>, StoreError>;

    /// Conditionally inserts an unlock row. Returns `false` when the user
    /// already holds the achievement (a concurrent evaluate won the race).
    async fn insert_unlock(&self, unlock: &UserAchievement) -> Result<bool, StoreError>;
}
