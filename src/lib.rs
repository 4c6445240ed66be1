//! Progression core of the exam-prep platform: XP accounting, level
//! derivation, streak computation, daily-goal tracking, and achievement
//! unlocking, persisted through an injected storage backend.
//!
//! The surrounding application owns rendering, sessions, and routing. This
//! crate only computes and persists progression state and reports which new
//! facts (level-up, fresh unlock) occurred so a caller can display them.

pub mod constants;
pub mod model;
pub mod progression;
pub mod store;

// Convenient re-exports for frequently used types.
pub use model::AppState;
pub use progression::ProgressionError;
pub use progression::activity::Difficulty;
pub use progression::ledger::XpOutcome;
pub use progression::levels::{LevelDefinition, LevelInfo, LevelTable};
pub use progression::streak::StreakState;
pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::{ProgressStore, StoreError};
