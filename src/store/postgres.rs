//! PostgreSQL `ProgressStore` backed by `sqlx`.
//!
//! Queries use the runtime API with bind parameters; the schema bootstrap in
//! `ensure_schema` creates the exact tables they expect. Counter bumps and
//! conditional inserts are pushed into SQL (`SET x = x + 1`,
//! `ON CONFLICT DO NOTHING`) so that even multiple app instances sharing one
//! database cannot duplicate rows or lose increments.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{AchievementDefinition, DailyProgress, UserAchievement, UserMeta, UserStats, XpHistoryEntry};
use super::{ProgressStore, StoreError};

const MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS user_stats (
        user_id BIGINT PRIMARY KEY,
        xp_total BIGINT NOT NULL DEFAULT 0,
        level INT NOT NULL DEFAULT 1,
        title TEXT NOT NULL DEFAULT '',
        streak_current INT NOT NULL DEFAULT 0,
        streak_max INT NOT NULL DEFAULT 0,
        last_study_date DATE,
        questions_answered INT NOT NULL DEFAULT 0,
        questions_correct INT NOT NULL DEFAULT 0,
        battles_played INT NOT NULL DEFAULT 0,
        battles_perfect INT NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS xp_history (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL,
        xp_gained BIGINT NOT NULL,
        reason TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )",
    "CREATE INDEX IF NOT EXISTS xp_history_user_idx ON xp_history (user_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS user_meta (
        user_id BIGINT PRIMARY KEY,
        daily_xp_goal BIGINT NOT NULL,
        daily_questions_goal INT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )",
    "CREATE TABLE IF NOT EXISTS daily_progress (
        user_id BIGINT NOT NULL,
        date DATE NOT NULL,
        xp_gained BIGINT NOT NULL DEFAULT 0,
        questions_answered INT NOT NULL DEFAULT 0,
        questions_correct INT NOT NULL DEFAULT 0,
        xp_goal_met BOOLEAN NOT NULL DEFAULT FALSE,
        questions_goal_met BOOLEAN NOT NULL DEFAULT FALSE,
        PRIMARY KEY (user_id, date)
    )",
    "CREATE TABLE IF NOT EXISTS achievements (
        id INT PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        icon TEXT NOT NULL,
        category TEXT NOT NULL,
        xp_bonus BIGINT NOT NULL DEFAULT 0,
        criterion_type TEXT NOT NULL,
        criterion_value BIGINT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )",
    "CREATE TABLE IF NOT EXISTS user_achievements (
        user_id BIGINT NOT NULL,
        achievement_id INT NOT NULL,
        unlocked_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (user_id, achievement_id)
    )",
];

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Store over an existing pool (the application owns pool lifecycle).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convenience constructor opening a small pool against `url`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Creates the progression tables when missing. Safe to run at every
    /// startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Upserts catalog entries, keyed by id. Run after `ensure_schema` to
    /// load or refresh the achievement catalog.
    pub async fn seed_achievements(&self, defs: &[AchievementDefinition]) -> Result<(), StoreError> {
        for def in defs {
            sqlx::query(
                "INSERT INTO achievements
                    (id, code, title, description, icon, category, xp_bonus, criterion_type, criterion_value, active)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                 ON CONFLICT (id) DO UPDATE SET
                    code = EXCLUDED.code,
                    title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    icon = EXCLUDED.icon,
                    category = EXCLUDED.category,
                    xp_bonus = EXCLUDED.xp_bonus,
                    criterion_type = EXCLUDED.criterion_type,
                    criterion_value = EXCLUDED.criterion_value,
                    active = EXCLUDED.active",
            )
            .bind(def.id)
            .bind(&def.code)
            .bind(&def.title)
            .bind(&def.description)
            .bind(&def.icon)
            .bind(&def.category)
            .bind(def.xp_bonus)
            .bind(&def.criterion_type)
            .bind(def.criterion_value)
            .bind(def.active)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for PgStore {
    async fn get_stats(&self, user_id: i64) -> Result<Option<UserStats>, StoreError> {
        let row = sqlx::query_as::<_, UserStats>(
            "SELECT user_id, xp_total, level, title, streak_current, streak_max,
                    last_study_date, questions_answered, questions_correct,
                    battles_played, battles_perfect
             FROM user_stats WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_stats(&self, stats: &UserStats) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO user_stats
                (user_id, xp_total, level, title, streak_current, streak_max,
                 last_study_date, questions_answered, questions_correct,
                 battles_played, battles_perfect)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(stats.user_id)
        .bind(stats.xp_total)
        .bind(stats.level)
        .bind(&stats.title)
        .bind(stats.streak_current)
        .bind(stats.streak_max)
        .bind(stats.last_study_date)
        .bind(stats.questions_answered)
        .bind(stats.questions_correct)
        .bind(stats.battles_played)
        .bind(stats.battles_perfect)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate);
        }
        Ok(())
    }

    async fn update_stats(&self, stats: &UserStats) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE user_stats SET
                xp_total = $2, level = $3, title = $4, streak_current = $5,
                streak_max = $6, last_study_date = $7, questions_answered = $8,
                questions_correct = $9, battles_played = $10, battles_perfect = $11
             WHERE user_id = $1",
        )
        .bind(stats.user_id)
        .bind(stats.xp_total)
        .bind(stats.level)
        .bind(&stats.title)
        .bind(stats.streak_current)
        .bind(stats.streak_max)
        .bind(stats.last_study_date)
        .bind(stats.questions_answered)
        .bind(stats.questions_correct)
        .bind(stats.battles_played)
        .bind(stats.battles_perfect)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn increment_question_counters(&self, user_id: i64, correct: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE user_stats SET
                questions_answered = questions_answered + 1,
                questions_correct = questions_correct + CASE WHEN $2 THEN 1 ELSE 0 END
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(correct)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn increment_battle_counters(&self, user_id: i64, perfect: bool) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE user_stats SET
                battles_played = battles_played + 1,
                battles_perfect = battles_perfect + CASE WHEN $2 THEN 1 ELSE 0 END
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(perfect)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_history(&self, entry: &XpHistoryEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO xp_history (user_id, xp_gained, reason, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(entry.user_id)
        .bind(entry.xp_gained)
        .bind(&entry.reason)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn history_for(&self, user_id: i64) -> Result<Vec<XpHistoryEntry>, StoreError> {
        let entries = sqlx::query_as::<_, XpHistoryEntry>(
            "SELECT user_id, xp_gained, reason, created_at
             FROM xp_history WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn get_meta(&self, user_id: i64) -> Result<Option<UserMeta>, StoreError> {
        let row = sqlx::query_as::<_, UserMeta>(
            "SELECT user_id, daily_xp_goal, daily_questions_goal, active
             FROM user_meta WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_meta(&self, meta: &UserMeta) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_meta (user_id, daily_xp_goal, daily_questions_goal, active)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                daily_xp_goal = EXCLUDED.daily_xp_goal,
                daily_questions_goal = EXCLUDED.daily_questions_goal,
                active = EXCLUDED.active",
        )
        .bind(meta.user_id)
        .bind(meta.daily_xp_goal)
        .bind(meta.daily_questions_goal)
        .bind(meta.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_daily(&self, user_id: i64, date: NaiveDate) -> Result<Option<DailyProgress>, StoreError> {
        let row = sqlx::query_as::<_, DailyProgress>(
            "SELECT user_id, date, xp_gained, questions_answered, questions_correct,
                    xp_goal_met, questions_goal_met
             FROM daily_progress WHERE user_id = $1 AND date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_daily(&self, progress: &DailyProgress) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO daily_progress
                (user_id, date, xp_gained, questions_answered, questions_correct,
                 xp_goal_met, questions_goal_met)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (user_id, date) DO UPDATE SET
                xp_gained = EXCLUDED.xp_gained,
                questions_answered = EXCLUDED.questions_answered,
                questions_correct = EXCLUDED.questions_correct,
                xp_goal_met = EXCLUDED.xp_goal_met,
                questions_goal_met = EXCLUDED.questions_goal_met",
        )
        .bind(progress.user_id)
        .bind(progress.date)
        .bind(progress.xp_gained)
        .bind(progress.questions_answered)
        .bind(progress.questions_correct)
        .bind(progress.xp_goal_met)
        .bind(progress.questions_goal_met)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn active_achievements(&self) -> Result<Vec<AchievementDefinition>, StoreError> {
        let defs = sqlx::query_as::<_, AchievementDefinition>(
            "SELECT id, code, title, description, icon, category, xp_bonus,
                    criterion_type, criterion_value, active
             FROM achievements WHERE active = TRUE ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(defs)
    }

    async fn unlocked_achievement_ids(&self, user_id: i64) -> Result<HashSet<i32>, StoreError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            "SELECT achievement_id FROM user_achievements WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn insert_unlock(&self, unlock: &UserAchievement) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO user_achievements (user_id, achievement_id, unlocked_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, achievement_id) DO NOTHING",
        )
        .bind(unlock.user_id)
        .bind(unlock.achievement_id)
        .bind(unlock.unlocked_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
