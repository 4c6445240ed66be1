//! Level ladder: derives discrete levels from cumulative XP.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// One tier of the ladder. `xp_threshold` is the cumulative XP at which the
/// tier starts; the first tier starts at 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: i32,
    pub xp_threshold: i64,
    pub title: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelTableError {
    #[error("level table must contain at least one tier")]
    Empty,
    #[error("first tier must start at 0 XP")]
    BaseNotZero,
    #[error("tier thresholds and levels must be strictly increasing")]
    NotIncreasing,
    #[error("invalid level table document: {0}")]
    Parse(String),
}

/// Where a given XP total sits on the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    pub level: i32,
    pub title: String,
    /// XP still missing for the next tier; 0 at the top of the ladder.
    pub xp_to_next: i64,
    /// Rounded 0-100 position inside the current tier; 100 at the top.
    pub progress_percent: u8,
    pub next_title: Option<String>,
}

/// Validated, immutable level ladder. Pure lookup, no state.
#[derive(Debug, Clone)]
pub struct LevelTable {
    tiers: Vec<LevelDefinition>,
}

impl LevelTable {
    /// Validates and adopts a ladder: non-empty, base tier at 0 XP,
    /// thresholds and level numbers strictly increasing.
    pub fn new(tiers: Vec<LevelDefinition>) -> Result<Self, LevelTableError> {
        let first = tiers.first().ok_or(LevelTableError::Empty)?;
        if first.xp_threshold != 0 {
            return Err(LevelTableError::BaseNotZero);
        }
        for pair in tiers.windows(2) {
            if pair[1].xp_threshold <= pair[0].xp_threshold || pair[1].level <= pair[0].level {
                return Err(LevelTableError::NotIncreasing);
            }
        }
        Ok(Self { tiers })
    }

    /// Loads a ladder from a JSON array of tiers (deployment configuration).
    pub fn from_json(raw: &str) -> Result<Self, LevelTableError> {
        let tiers: Vec<LevelDefinition> =
            serde_json::from_str(raw).map_err(|e| LevelTableError::Parse(e.to_string()))?;
        Self::new(tiers)
    }

    pub fn tiers(&self) -> &[LevelDefinition] {
        &self.tiers
    }

    /// Highest tier whose threshold does not exceed `xp_total`.
    pub fn level_for(&self, xp_total: i64) -> LevelInfo {
        let xp = xp_total.max(0);
        let mut idx = 0;
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.xp_threshold <= xp {
                idx = i;
            } else {
                break;
            }
        }
        let current = &self.tiers[idx];
        match self.tiers.get(idx + 1) {
            Some(next) => {
                // Span is positive by construction, so the division is safe.
                let span = next.xp_threshold - current.xp_threshold;
                let into = xp - current.xp_threshold;
                let progress_percent = ((into * 100 + span / 2) / span) as u8;
                LevelInfo {
                    level: current.level,
                    title: current.title.clone(),
                    xp_to_next: next.xp_threshold - xp,
                    progress_percent,
                    next_title: Some(next.title.clone()),
                }
            }
            None => LevelInfo {
                level: current.level,
                title: current.title.clone(),
                xp_to_next: 0,
                progress_percent: 100,
                next_title: None,
            },
        }
    }
}

impl Default for LevelTable {
    /// The reference ten-tier ladder from `constants`.
    fn default() -> Self {
        Self::new(constants::default_level_table())
            .expect("reference level ladder is strictly increasing")
    }
}
