//! XP ledger: the single write path for XP totals, levels, and streaks.

use chrono::Utc;
use tracing::{instrument, warn};

use super::ProgressionError;
use super::levels::LevelInfo;
use super::streak::{self, StreakState};
use crate::model::AppState;
use crate::store::StoreError;
use crate::store::models::{UserStats, XpHistoryEntry};

/// Result descriptor of one XP grant, for the caller to render.
#[derive(Debug, Clone)]
pub struct XpOutcome {
    pub xp_gained: i64,
    pub xp_total: i64,
    pub level: LevelInfo,
    pub streak: StreakState,
    /// Whether this grant crossed a level threshold.
    pub leveled_up: bool,
}

/// Fetches the user's stats row, creating the zeroed bottom-of-ladder row on
/// first access. Idempotent: losing a concurrent create race falls back to
/// the winner's row.
pub async fn get_or_create_stats(
    state: &AppState,
    user_id: i64,
) -> Result<UserStats, ProgressionError> {
    if let Some(stats) = state.store.get_stats(user_id).await? {
        return Ok(stats);
    }
    let base = state.levels.level_for(0);
    let fresh = UserStats::fresh(user_id, base.level, &base.title);
    match state.store.insert_stats(&fresh).await {
        Ok(()) => Ok(fresh),
        Err(StoreError::Duplicate) => {
            // Another call created the row between our read and insert.
            let stats = state.store.get_stats(user_id).await?;
            Ok(stats.ok_or(StoreError::NotFound)?)
        }
        Err(err) => Err(err.into()),
    }
}

/// Applies an XP delta for the user: recomputes level and streak, persists
/// the stats row, and appends one history entry.
#[instrument(level = "debug", skip(state))]
pub async fn add_xp(
    state: &AppState,
    user_id: i64,
    amount: i64,
    reason: &str,
) -> Result<XpOutcome, ProgressionError> {
    let _guard = state.lock_user(user_id).await;
    add_xp_locked(state, user_id, amount, reason).await
}

/// Ledger core; the caller must already hold the user's lock.
pub(crate) async fn add_xp_locked(
    state: &AppState,
    user_id: i64,
    amount: i64,
    reason: &str,
) -> Result<XpOutcome, ProgressionError> {
    let mut stats = get_or_create_stats(state, user_id).await?;
    let new_total = stats.xp_total + amount;
    if new_total < 0 {
        return Err(ProgressionError::NegativeXpTotal {
            user_id,
            attempted: new_total,
        });
    }
    if amount < 0 {
        warn!(target: "progression.ledger", user_id, amount, "applying negative xp delta");
    }

    let today = Utc::now().date_naive();
    let streak = streak::advance(
        stats.last_study_date,
        today,
        StreakState {
            current: stats.streak_current,
            max: stats.streak_max,
        },
    );
    let level = state.levels.level_for(new_total);
    let leveled_up = level.level > stats.level;

    stats.xp_total = new_total;
    stats.level = level.level;
    stats.title = level.title.clone();
    stats.streak_current = streak.current;
    stats.streak_max = streak.max;
    stats.last_study_date = Some(today);
    state.store.update_stats(&stats).await?;

    // History is audit-only: a failed append surfaces without undoing the
    // stats write.
    state
        .store
        .insert_history(&XpHistoryEntry {
            user_id,
            xp_gained: amount,
            reason: reason.to_string(),
            created_at: Utc::now(),
        })
        .await?;

    Ok(XpOutcome {
        xp_gained: amount,
        xp_total: new_total,
        level,
        streak,
        leveled_up,
    })
}
