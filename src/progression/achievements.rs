//! Achievement catalog evaluation and unlocking.

use chrono::Utc;
use tracing::{instrument, warn};

use super::ProgressionError;
use super::ledger;
use crate::model::AppState;
use crate::store::models::{AchievementDefinition, UserAchievement, UserStats};

/// Criterion kinds understood by the evaluator. Catalog rows carry these as
/// string codes; anything unrecognized fails closed and never unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    QuestionsAnswered,
    QuestionsCorrect,
    BattlesPlayed,
    BattlesPerfect,
    CurrentStreak,
    TotalXp,
    Level,
    DiagnosticComplete,
}

impl Criterion {
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "questoes_respondidas" => Self::QuestionsAnswered,
            "questoes_corretas" => Self::QuestionsCorrect,
            "batalhas_jogadas" => Self::BattlesPlayed,
            "batalhas_perfeitas" => Self::BattlesPerfect,
            "streak_atual" => Self::CurrentStreak,
            "xp_total" => Self::TotalXp,
            "nivel" => Self::Level,
            "diagnostico_completo" => Self::DiagnosticComplete,
            _ => return None,
        })
    }

    /// Whether the stats snapshot satisfies this criterion at `threshold`.
    /// `diagnostico_completo` tests the supplied flag and ignores the
    /// threshold.
    pub fn satisfied(self, stats: &UserStats, diagnostic_complete: bool, threshold: i64) -> bool {
        match self {
            Self::QuestionsAnswered => i64::from(stats.questions_answered) >= threshold,
            Self::QuestionsCorrect => i64::from(stats.questions_correct) >= threshold,
            Self::BattlesPlayed => i64::from(stats.battles_played) >= threshold,
            Self::BattlesPerfect => i64::from(stats.battles_perfect) >= threshold,
            Self::CurrentStreak => i64::from(stats.streak_current) >= threshold,
            Self::TotalXp => stats.xp_total >= threshold,
            Self::Level => i64::from(stats.level) >= threshold,
            Self::DiagnosticComplete => diagnostic_complete,
        }
    }
}

/// Scans the active catalog against the supplied stats snapshot and unlocks
/// everything newly satisfied, granting each entry's XP bonus through the
/// ledger so level, streak, and history stay consistent with every other
/// grant. Returns the newly unlocked definitions in catalog order.
#[instrument(level = "debug", skip(state, stats))]
pub async fn evaluate(
    state: &AppState,
    user_id: i64,
    stats: &UserStats,
    diagnostic_complete: bool,
) -> Result<Vec<AchievementDefinition>, ProgressionError> {
    let catalog = state.store.active_achievements().await?;
    let unlocked = state.store.unlocked_achievement_ids(user_id).await?;

    let mut newly = Vec::new();
    for def in catalog {
        if unlocked.contains(&def.id) {
            continue;
        }
        let Some(criterion) = Criterion::from_code(&def.criterion_type) else {
            warn!(
                target: "progression.achievements",
                code = %def.criterion_type,
                achievement = %def.code,
                "unknown criterion type"
            );
            continue;
        };
        if !criterion.satisfied(stats, diagnostic_complete, def.criterion_value) {
            continue;
        }
        let row = UserAchievement {
            user_id,
            achievement_id: def.id,
            unlocked_at: Utc::now(),
        };
        if !state.store.insert_unlock(&row).await? {
            // A concurrent evaluate won this unlock; it is not new here.
            continue;
        }
        if def.xp_bonus > 0 {
            let reason = format!("Conquista: {}", def.title);
            ledger::add_xp(state, user_id, def.xp_bonus, &reason).await?;
        }
        newly.push(def);
    }
    Ok(newly)
}
