//! # Outbound Ports
//!
//! Traits for external dependencies: persistence, time, invite code
//! entropy and the identity provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    InviteCode, Notification, NotificationId, Principal, RewardsError, Timestamp, User, UserId,
    Withdrawal,
};

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend unreachable or failing.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Optimistic concurrency check failed on save.
    #[error("{entity} version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// Entity kind
        entity: &'static str,
        /// Version the caller read
        expected: u64,
        /// Version currently stored
        found: u64,
    },

    /// Invite code already owned by another user.
    #[error("duplicate invite code: {0}")]
    DuplicateInviteCode(InviteCode),

    /// External identity already bound to another user.
    #[error("duplicate external id: {0}")]
    DuplicateExternalId(String),

    /// Record to update no longer exists.
    #[error("{0} does not exist")]
    Missing(String),
}

impl From<StoreError> for RewardsError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => RewardsError::Upstream(msg),
            other => RewardsError::Conflict(other.to_string()),
        }
    }
}

/// User documents - outbound port.
///
/// `save` is a whole-document replace guarded by `User::version`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find by local id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Find the owner of an invite code.
    async fn find_by_invite_code(&self, code: &InviteCode) -> Result<Option<User>, StoreError>;

    /// Find by identity provider subject.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Fails on duplicate invite code or external id.
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Replace a user if the stored version equals `user.version`.
    ///
    /// Returns the stored copy with the bumped version.
    async fn save(&self, user: &User) -> Result<User, StoreError>;

    /// Delete by id. Returns whether a record was removed.
    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;

    /// Total number of users.
    async fn count(&self) -> Result<u64, StoreError>;
}

/// Withdrawal records - outbound port.
#[async_trait]
pub trait WithdrawalStore: Send + Sync {
    /// Insert a new record.
    async fn create(&self, withdrawal: Withdrawal) -> Result<Withdrawal, StoreError>;

    /// Records of one user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Withdrawal>, StoreError>;

    /// All records, newest first.
    async fn list_all(&self) -> Result<Vec<Withdrawal>, StoreError>;
}

/// Notifications - outbound port.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a new notification.
    async fn create(&self, notification: Notification) -> Result<Notification, StoreError>;

    /// Find by id.
    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>, StoreError>;

    /// Replace an existing notification.
    async fn save(&self, notification: &Notification) -> Result<(), StoreError>;

    /// Delete by id. Returns whether a record was removed.
    async fn delete(&self, id: NotificationId) -> Result<bool, StoreError>;

    /// All notifications, newest first.
    async fn list(&self) -> Result<Vec<Notification>, StoreError>;
}

/// Time source.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Source of candidate invite codes. Uniqueness is checked by the caller.
pub trait InviteCodeSource: Send + Sync {
    /// Produce a candidate code.
    fn generate(&self) -> InviteCode;
}

/// External identity provider - outbound port.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token. `None` if the token is not recognized.
    async fn authenticate(&self, token: &str) -> Option<Principal>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;

    #[test]
    fn test_store_error_mapping() {
        let err: RewardsError = StoreError::Unavailable("down".into()).into();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);

        let err: RewardsError = StoreError::VersionConflict {
            entity: "user",
            expected: 1,
            found: 2,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("expected 1"));
    }
}
