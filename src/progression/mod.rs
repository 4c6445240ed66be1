//! Domain logic of the progression core: the level ladder, streak
//! derivation, the XP ledger, activity translators, daily goals, and
//! achievement evaluation.

pub mod achievements;
pub mod activity;
pub mod daily;
pub mod ledger;
pub mod levels;
pub mod streak;

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by progression operations. Nothing here is fatal to the
/// process; every operation returns a result the caller can report on.
#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The submitted delta would drive the user's XP total below zero.
    #[error("xp delta for user {user_id} would drive the total to {attempted}")]
    NegativeXpTotal { user_id: i64, attempted: i64 },
    /// Daily goal targets must be non-negative.
    #[error("daily goal targets must be non-negative")]
    InvalidGoal,
}
