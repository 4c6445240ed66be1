//! In-memory `ProgressStore` used by the test suite and local fixtures.
//!
//! Tables are plain maps behind `tokio::sync::RwLock`, keyed exactly like
//! the rows of the Postgres backend so the two stay interchangeable.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::models::{AchievementDefinition, DailyProgress, UserAchievement, UserMeta, UserStats, XpHistoryEntry};
use super::{ProgressStore, StoreError};
use crate::constants;

#[derive(Default)]
pub struct MemoryStore {
    stats: RwLock<HashMap<i64, UserStats>>,
    history: RwLock<Vec<XpHistoryEntry>>,
    meta: RwLock<HashMap<i64, UserMeta>>,
    daily: RwLock<HashMap<(i64, NaiveDate), DailyProgress>>,
    catalog: RwLock<Vec<AchievementDefinition>>,
    unlocks: RwLock<Vec<UserAchievement>>,
}

impl MemoryStore {
    /// Empty store; seed a catalog before evaluating achievements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the reference achievement catalog.
    pub fn with_default_catalog() -> Self {
        Self {
            catalog: RwLock::new(constants::default_achievement_catalog()),
            ..Self::default()
        }
    }

    /// Replaces the achievement catalog.
    pub async fn seed_achievements(&self, defs: Vec<AchievementDefinition>) {
        *self.catalog.write().await = defs;
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn get_stats(&self, user_id: i64) -> Result<Option<UserStats>, StoreError> {
        Ok(self.stats.read().await.get(&user_id).cloned())
    }

    async fn insert_stats(&self, stats: &UserStats) -> Result<(), StoreError> {
        let mut table = self.stats.write().await;
        if table.contains_key(&stats.user_id) {
            return Err(StoreError::Duplicate);
        }
        table.insert(stats.user_id, stats.clone());
        Ok(())
    }

    async fn update_stats(&self, stats: &UserStats) -> Result<(), StoreError> {
        let mut table = self.stats.write().await;
        match table.get_mut(&stats.user_id) {
            Some(row) => {
                *row = stats.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn increment_question_counters(&self, user_id: i64, correct: bool) -> Result<(), StoreError> {
        let mut table = self.stats.write().await;
        let row = table.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        row.questions_answered += 1;
        if correct {
            row.questions_correct += 1;
        }
        Ok(())
    }

    async fn increment_battle_counters(&self, user_id: i64, perfect: bool) -> Result<(), StoreError> {
        let mut table = self.stats.write().await;
        let row = table.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        row.battles_played += 1;
        if perfect {
            row.battles_perfect += 1;
        }
        Ok(())
    }

    async fn insert_history(&self, entry: &XpHistoryEntry) -> Result<(), StoreError> {
        self.history.write().await.push(entry.clone());
        Ok(())
    }

    async fn history_for(&self, user_id: i64) -> Result<Vec<XpHistoryEntry>, StoreError> {
        let mut entries: Vec<XpHistoryEntry> = self
            .history
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }

    async fn get_meta(&self, user_id: i64) -> Result<Option<UserMeta>, StoreError> {
        Ok(self.meta.read().await.get(&user_id).cloned())
    }

    async fn upsert_meta(&self, meta: &UserMeta) -> Result<(), StoreError> {
        self.meta.write().await.insert(meta.user_id, meta.clone());
        Ok(())
    }

    async fn get_daily(&self, user_id: i64, date: NaiveDate) -> Result<Option<DailyProgress>, StoreError> {
        Ok(self.daily.read().await.get(&(user_id, date)).cloned())
    }

    async fn upsert_daily(&self, progress: &DailyProgress) -> Result<(), StoreError> {
        self.daily
            .write()
            .await
            .insert((progress.user_id, progress.date), progress.clone());
        Ok(())
    }

    async fn active_achievements(&self) -> Result<Vec<AchievementDefinition>, StoreError> {
        Ok(self
            .catalog
            .read()
            .await
            .iter()
            .filter(|d| d.active)
            .cloned()
            .collect())
    }

    async fn unlocked_achievement_ids(&self, user_id: i64) -> Result<HashSet<i32>, StoreError> {
        Ok(self
            .unlocks
            .read()
            .await
            .iter()
            .filter(|u| u.user_id == user_id)
            .map(|u| u.achievement_id)
            .collect())
    }

    async fn insert_unlock(&self, unlock: &UserAchievement) -> Result<bool, StoreError> {
        let mut unlocks = self.unlocks.write().await;
        let already = unlocks
            .iter()
            .any(|u| u.user_id == unlock.user_id && u.achievement_id == unlock.achievement_id);
        if already {
            return Ok(false);
        }
        unlocks.push(unlock.clone());
        Ok(true)
    }
}
