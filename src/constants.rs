//! Central constants for progression balancing.

use crate::progression::levels::LevelDefinition;
use crate::store::models::AchievementDefinition;

// XP granted for a correctly answered question, by difficulty.
pub const XP_QUESTION_EASY: i64 = 5;
pub const XP_QUESTION_MEDIUM: i64 = 10;
pub const XP_QUESTION_HARD: i64 = 15;

// Timed battle rewards.
pub const XP_PER_BATTLE_CORRECT: i64 = 20;
pub const XP_BATTLE_PERFECT_BONUS: i64 = 50; // flat bonus when every answer lands

// Daily goal defaults applied when a user has no saved config.
pub const DEFAULT_DAILY_XP_GOAL: i64 = 50;
pub const DEFAULT_DAILY_QUESTIONS_GOAL: i32 = 10;

/// The reference ten-tier level ladder, 0 to 5500 XP.
/// Deployments may swap in their own ladder via `LevelTable::new`.
pub fn default_level_table() -> Vec<LevelDefinition> {
    let tiers = [
        (1, 0, "Iniciante"),
        (2, 100, "Aprendiz"),
        (3, 250, "Estudante"),
        (4, 500, "Dedicado"),
        (5, 900, "Focado"),
        (6, 1400, "Veterano"),
        (7, 2100, "Especialista"),
        (8, 3000, "Mestre"),
        (9, 4100, "Grão-Mestre"),
        (10, 5500, "Lenda"),
    ];
    tiers
        .into_iter()
        .map(|(level, xp_threshold, title)| LevelDefinition {
            level,
            xp_threshold,
            title: title.to_string(),
        })
        .collect()
}

/// The reference achievement catalog. Stored as data so a deployment can
/// extend it without touching the evaluator.
pub fn default_achievement_catalog() -> Vec<AchievementDefinition> {
    fn def(
        id: i32,
        code: &str,
        title: &str,
        description: &str,
        icon: &str,
        category: &str,
        xp_bonus: i64,
        criterion_type: &str,
        criterion_value: i64,
    ) -> AchievementDefinition {
        AchievementDefinition {
            id,
            code: code.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category: category.to_string(),
            xp_bonus,
            criterion_type: criterion_type.to_string(),
            criterion_value,
            active: true,
        }
    }

    vec![
        def(
            1,
            "primeira_questao",
            "Primeira Questão",
            "Responda sua primeira questão",
            "📝",
            "questoes",
            10,
            "questoes_respondidas",
            1,
        ),
        def(
            2,
            "dez_questoes",
            "Aquecendo",
            "Responda 10 questões",
            "🔥",
            "questoes",
            20,
            "questoes_respondidas",
            10,
        ),
        def(
            3,
            "cem_questoes",
            "Maratonista",
            "Responda 100 questões",
            "🏃",
            "questoes",
            100,
            "questoes_respondidas",
            100,
        ),
        def(
            4,
            "cinquenta_corretas",
            "Precisão",
            "Acerte 50 questões",
            "🎯",
            "questoes",
            50,
            "questoes_corretas",
            50,
        ),
        def(
            5,
            "primeira_batalha",
            "Estreia na Arena",
            "Complete sua primeira batalha",
            "⚔️",
            "batalhas",
            20,
            "batalhas_jogadas",
            1,
        ),
        def(
            6,
            "batalha_perfeita",
            "Impecável",
            "Vença uma batalha sem errar",
            "🏆",
            "batalhas",
            50,
            "batalhas_perfeitas",
            1,
        ),
        def(
            7,
            "streak_7",
            "Semana Completa",
            "Estude 7 dias seguidos",
            "📅",
            "streak",
            70,
            "streak_atual",
            7,
        ),
        def(
            8,
            "streak_30",
            "Mês de Fogo",
            "Estude 30 dias seguidos",
            "🌋",
            "streak",
            300,
            "streak_atual",
            30,
        ),
        def(
            9,
            "xp_1000",
            "Milhar",
            "Acumule 1000 XP",
            "💎",
            "progresso",
            100,
            "xp_total",
            1000,
        ),
        def(
            10,
            "nivel_5",
            "Meio do Caminho",
            "Alcance o nível 5",
            "⭐",
            "progresso",
            50,
            "nivel",
            5,
        ),
        def(
            11,
            "diagnostico",
            "Autoconhecimento",
            "Complete o diagnóstico inicial",
            "🧭",
            "diagnostico",
            30,
            "diagnostico_completo",
            1,
        ),
    ]
}
