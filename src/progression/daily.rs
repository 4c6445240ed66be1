//! Daily goal tracking: per-day XP and question accumulators measured
//! against the user's configured targets.

use chrono::Utc;
use tracing::instrument;

use super::ProgressionError;
use crate::constants::{DEFAULT_DAILY_QUESTIONS_GOAL, DEFAULT_DAILY_XP_GOAL};
use crate::model::AppState;
use crate::store::models::{DailyProgress, UserMeta};

/// Returns the user's goal config, creating the default row (50 XP, 10
/// questions, active) on first access.
pub async fn get_or_create_meta(state: &AppState, user_id: i64) -> Result<UserMeta, ProgressionError> {
    if let Some(meta) = state.store.get_meta(user_id).await? {
        return Ok(meta);
    }
    let meta = UserMeta {
        user_id,
        daily_xp_goal: DEFAULT_DAILY_XP_GOAL,
        daily_questions_goal: DEFAULT_DAILY_QUESTIONS_GOAL,
        active: true,
    };
    state.store.upsert_meta(&meta).await?;
    Ok(meta)
}

/// Today's accumulator row, zeroed on first access.
pub async fn get_or_create_today(
    state: &AppState,
    user_id: i64,
) -> Result<DailyProgress, ProgressionError> {
    let today = Utc::now().date_naive();
    if let Some(row) = state.store.get_daily(user_id, today).await? {
        return Ok(row);
    }
    let row = DailyProgress {
        user_id,
        date: today,
        xp_gained: 0,
        questions_answered: 0,
        questions_correct: 0,
        xp_goal_met: false,
        questions_goal_met: false,
    };
    state.store.upsert_daily(&row).await?;
    Ok(row)
}

/// Adds one activity's deltas to today's row and refreshes the met-flags.
///
/// Purely additive; the caller invokes it exactly once per real activity.
#[instrument(level = "debug", skip(state))]
pub async fn record_activity(
    state: &AppState,
    user_id: i64,
    xp: i64,
    answered: i32,
    correct: i32,
) -> Result<DailyProgress, ProgressionError> {
    let _guard = state.lock_user(user_id).await;
    let goals = get_or_create_meta(state, user_id).await?;
    let mut row = get_or_create_today(state, user_id).await?;
    row.xp_gained += xp;
    row.questions_answered += answered;
    row.questions_correct += correct;
    row.xp_goal_met = row.xp_gained >= goals.daily_xp_goal;
    row.questions_goal_met = row.questions_answered >= goals.daily_questions_goal;
    state.store.upsert_daily(&row).await?;
    Ok(row)
}

/// Overwrites the user's daily targets. Rows already graded keep the
/// met-flags they were written with; nothing is recomputed retroactively.
#[instrument(level = "debug", skip(state))]
pub async fn update_goal(
    state: &AppState,
    user_id: i64,
    xp_goal: i64,
    questions_goal: i32,
) -> Result<UserMeta, ProgressionError> {
    if xp_goal < 0 || questions_goal < 0 {
        return Err(ProgressionError::InvalidGoal);
    }
    let active = state
        .store
        .get_meta(user_id)
        .await?
        .map(|meta| meta.active)
        .unwrap_or(true);
    let meta = UserMeta {
        user_id,
        daily_xp_goal: xp_goal,
        daily_questions_goal: questions_goal,
        active,
    };
    state.store.upsert_meta(&meta).await?;
    Ok(meta)
}
