//! Translates gradeable platform events into XP deltas and counter updates.

use tracing::{debug, instrument};

use super::ProgressionError;
use super::ledger::{self, XpOutcome};
use crate::constants::{
    XP_BATTLE_PERFECT_BONUS, XP_PER_BATTLE_CORRECT, XP_QUESTION_EASY, XP_QUESTION_HARD,
    XP_QUESTION_MEDIUM,
};
use crate::model::AppState;

/// Question difficulty as labelled by the platform. Unknown or missing
/// codes fall back to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "facil" | "fácil" => Self::Easy,
            "dificil" | "difícil" => Self::Hard,
            _ => Self::Medium,
        }
    }

    pub fn xp(self) -> i64 {
        match self {
            Self::Easy => XP_QUESTION_EASY,
            Self::Medium => XP_QUESTION_MEDIUM,
            Self::Hard => XP_QUESTION_HARD,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Easy => "fácil",
            Self::Medium => "média",
            Self::Hard => "difícil",
        }
    }
}

/// Grades one answered question.
///
/// The answered/correct counters move even when no XP is granted; the
/// ledger is only involved for a correct answer. Returns `None` when the
/// answer was wrong.
#[instrument(level = "debug", skip(state))]
pub async fn register_question_answered(
    state: &AppState,
    user_id: i64,
    correct: bool,
    difficulty: Difficulty,
) -> Result<Option<XpOutcome>, ProgressionError> {
    let _guard = state.lock_user(user_id).await;
    ledger::get_or_create_stats(state, user_id).await?;
    state
        .store
        .increment_question_counters(user_id, correct)
        .await?;
    if !correct {
        debug!(target: "progression.activity", user_id, "incorrect answer, no xp granted");
        return Ok(None);
    }
    let reason = format!("Questão {} correta", difficulty.label());
    let outcome = ledger::add_xp_locked(state, user_id, difficulty.xp(), &reason).await?;
    Ok(Some(outcome))
}

/// Applies a finished timed battle of `correct_count` right answers out of
/// `total_count`.
///
/// Each correct answer earns a fixed reward and a flawless run adds a flat
/// bonus. The played/perfect counters move unconditionally; the ledger is
/// only called for a positive delta, so a battle with zero correct answers
/// returns `None`.
#[instrument(level = "debug", skip(state))]
pub async fn register_battle(
    state: &AppState,
    user_id: i64,
    correct_count: i32,
    total_count: i32,
) -> Result<Option<XpOutcome>, ProgressionError> {
    let _guard = state.lock_user(user_id).await;
    ledger::get_or_create_stats(state, user_id).await?;
    let perfect = total_count > 0 && correct_count == total_count;
    state
        .store
        .increment_battle_counters(user_id, perfect)
        .await?;

    let mut delta = i64::from(correct_count.max(0)) * XP_PER_BATTLE_CORRECT;
    if perfect {
        delta += XP_BATTLE_PERFECT_BONUS;
    }
    if delta <= 0 {
        debug!(target: "progression.activity", user_id, "battle earned no xp");
        return Ok(None);
    }
    let reason = if perfect {
        format!("Batalha perfeita: {correct_count}/{total_count}")
    } else {
        format!("Batalha concluída: {correct_count}/{total_count}")
    };
    let outcome = ledger::add_xp_locked(state, user_id, delta, &reason).await?;
    Ok(Some(outcome))
}
