//! Shared engine state handed to every progression operation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::progression::levels::LevelTable;
use crate::store::ProgressStore;

/// Registry of per-user async locks.
///
/// Every progression write is a read-modify-write sequence against shared
/// per-user rows; holding the user's lock across the sequence keeps two rapid
/// submissions from reading the same prior total and overwriting each other.
/// Locks for distinct users are independent.
#[derive(Default)]
pub(crate) struct UserLocks {
    inner: RwLock<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub(crate) async fn acquire(&self, user_id: i64) -> OwnedMutexGuard<()> {
        // Fast path: read lock only.
        let existing = self.inner.read().await.get(&user_id).cloned();
        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut write = self.inner.write().await;
                write
                    .entry(user_id)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            }
        };
        lock.lock_owned().await
    }
}

/// The central, shared state of the progression engine.
///
/// The application entry point constructs one `AppState`, injecting the
/// persistence backend and (optionally) a custom level ladder, and passes
/// `&AppState` into every operation. There is no global connection state.
pub struct AppState {
    /// Persistence collaborator for all progression collections.
    pub store: Arc<dyn ProgressStore>,
    /// Level ladder used to derive levels from cumulative XP.
    pub levels: LevelTable,
    user_locks: UserLocks,
}

impl AppState {
    /// Engine over `store` with the reference level ladder.
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self::with_level_table(store, LevelTable::default())
    }

    /// Engine over `store` with a custom (already validated) level ladder.
    pub fn with_level_table(store: Arc<dyn ProgressStore>, levels: LevelTable) -> Self {
        Self {
            store,
            levels,
            user_locks: UserLocks::default(),
        }
    }

    /// Serializes mutating operations for one user; see `UserLocks`.
    pub(crate) async fn lock_user(&self, user_id: i64) -> OwnedMutexGuard<()> {
        self.user_locks.acquire(user_id).await
    }
}
