//! In-Memory Store Adapter
//!
//! Implements `UserStore`, `WithdrawalStore` and `NotificationStore` over
//! `parking_lot` maps. Every write replaces a whole document, matching a
//! document database's single-document atomicity.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

use crate::domain::{InviteCode, Notification, NotificationId, User, UserId, Withdrawal};
use crate::ports::outbound::{NotificationStore, StoreError, UserStore, WithdrawalStore};

#[derive(Default)]
struct UserTable {
    by_id: HashMap<UserId, User>,
    by_invite_code: HashMap<InviteCode, UserId>,
    by_external_id: HashMap<String, UserId>,
}

/// In-memory persistence for users, withdrawals and notifications.
///
/// Failure switches let tests drive the compensation paths.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<UserTable>,
    withdrawals: RwLock<Vec<Withdrawal>>,
    notifications: RwLock<HashMap<NotificationId, Notification>>,
    user_save_budget: Mutex<Option<usize>>,
    fail_user_deletes: AtomicBool,
    fail_withdrawal_creates: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `UserStore::save` fail with `Unavailable`.
    pub fn set_fail_user_saves(&self, fail: bool) {
        *self.user_save_budget.lock() = fail.then_some(0);
    }

    /// Let `saves` more `UserStore::save` calls succeed, then fail.
    pub fn set_fail_user_saves_after(&self, saves: usize) {
        *self.user_save_budget.lock() = Some(saves);
    }

    /// Make every `UserStore::delete` fail with `Unavailable`.
    pub fn set_fail_user_deletes(&self, fail: bool) {
        self.fail_user_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make every `WithdrawalStore::create` fail with `Unavailable`.
    pub fn set_fail_withdrawal_creates(&self, fail: bool) {
        self.fail_withdrawal_creates.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{op} disabled")));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().by_id.get(&id).cloned())
    }

    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<User>, StoreError> {
        let users = self.users.read();
        Ok(users
            .by_invite_code
            .get(code)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read();
        Ok(users
            .by_external_id
            .get(external_id)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users.by_invite_code.contains_key(&user.invite_code) {
            return Err(StoreError::DuplicateInviteCode(user.invite_code));
        }
        if let Some(external_id) = &user.external_id {
            if users.by_external_id.contains_key(external_id) {
                return Err(StoreError::DuplicateExternalId(external_id.clone()));
            }
            users.by_external_id.insert(external_id.clone(), user.id);
        }
        users.by_invite_code.insert(user.invite_code.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        debug!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        {
            let mut budget = self.user_save_budget.lock();
            match budget.as_mut() {
                Some(0) => return Err(StoreError::Unavailable("user save disabled".into())),
                Some(left) => *left -= 1,
                None => {}
            }
        }

        let mut users = self.users.write();
        let stored = users
            .by_id
            .get_mut(&user.id)
            .ok_or_else(|| StoreError::Missing(format!("user {}", user.id)))?;
        if stored.version != user.version {
            return Err(StoreError::VersionConflict {
                entity: "user",
                expected: user.version,
                found: stored.version,
            });
        }
        // Invite codes and external ids are immutable once stored, except
        // that a principal may be bound to an invite-only user.
        let newly_bound = match (&stored.external_id, &user.external_id) {
            (None, Some(external_id)) => Some(external_id.clone()),
            _ => None,
        };

        let mut next = user.clone();
        next.version += 1;
        *stored = next.clone();
        if let Some(external_id) = newly_bound {
            users.by_external_id.insert(external_id, user.id);
        }
        Ok(next)
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        Self::check(&self.fail_user_deletes, "user delete")?;

        let mut users = self.users.write();
        let Some(user) = users.by_id.remove(&id) else {
            return Ok(false);
        };
        users.by_invite_code.remove(&user.invite_code);
        if let Some(external_id) = &user.external_id {
            users.by_external_id.remove(external_id);
        }
        debug!(user_id = %id, "user deleted");
        Ok(true)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.users.read().by_id.len() as u64)
    }
}

#[async_trait]
impl WithdrawalStore for InMemoryStore {
    async fn create(&self, withdrawal: Withdrawal) -> Result<Withdrawal, StoreError> {
        Self::check(&self.fail_withdrawal_creates, "withdrawal create")?;
        self.withdrawals.write().push(withdrawal.clone());
        Ok(withdrawal)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Withdrawal>, StoreError> {
        let mut rows: Vec<_> = self
            .withdrawals
            .read()
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |w| w.created_at);
        Ok(rows)
    }

    async fn list_all(&self) -> Result<Vec<Withdrawal>, StoreError> {
        let mut rows = self.withdrawals.read().clone();
        newest_first(&mut rows, |w| w.created_at);
        Ok(rows)
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn create(&self, notification: Notification) -> Result<Notification, StoreError> {
        self.notifications
            .write()
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>, StoreError> {
        Ok(self.notifications.read().get(&id).cloned())
    }

    async fn save(&self, notification: &Notification) -> Result<(), StoreError> {
        let mut notifications = self.notifications.write();
        let stored = notifications
            .get_mut(&notification.id)
            .ok_or_else(|| StoreError::Missing(format!("notification {}", notification.id)))?;
        *stored = notification.clone();
        Ok(())
    }

    async fn delete(&self, id: NotificationId) -> Result<bool, StoreError> {
        Ok(self.notifications.write().remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<Notification>, StoreError> {
        let mut rows: Vec<_> = self.notifications.read().values().cloned().collect();
        newest_first(&mut rows, |n| n.created_at);
        Ok(rows)
    }
}

/// Stable sort, newest first. Ties keep insertion order reversed.
fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.reverse();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}
