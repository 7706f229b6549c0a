//! # Per-User Locks
//!
//! Serializes read-modify-write cycles on one user document within the
//! process.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::UserId;

/// Lazily created async mutex per user.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`.
    pub async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        // The map shard guard must be released before awaiting.
        let lock = self.locks.entry(user_id).or_default().clone();
        lock.lock_owned().await
    }

    /// Drop the entry for `user_id` if nobody holds or waits on it.
    pub fn forget(&self, user_id: UserId) {
        self.locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of tracked users.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// True if no user is tracked.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
