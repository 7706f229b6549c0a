//! # Inbound Ports
//!
//! API trait defining what the rewards core can do.

use async_trait::async_trait;

use crate::domain::{
    InviteCode, InviteDetails, NewNotification, Notification, NotificationId, NotificationView,
    Principal, ReferralOutcome, RewardsError, Session, SessionCompletion, UserId, UserProfile,
    WalletAddresses, Withdrawal, WithdrawalScope, WithdrawalSummary,
};

/// Rewards API - inbound port.
#[async_trait]
pub trait RewardsApi: Send + Sync {
    /// Create an anonymous user and return its invite code.
    async fn register_user(&self) -> Result<InviteCode, RewardsError>;

    /// Public view of an invite code.
    async fn get_invite_details(&self, code: &InviteCode) -> Result<InviteDetails, RewardsError>;

    /// Create a user referred by `referrer` and credit the referral bonus.
    async fn process_referral(&self, referrer: &InviteCode)
        -> Result<ReferralOutcome, RewardsError>;

    /// Bind a principal to a local user, creating it on first sight.
    ///
    /// Returns the profile and whether the user was created.
    async fn sync_principal(
        &self,
        principal: &Principal,
        country: Option<String>,
    ) -> Result<(UserProfile, bool), RewardsError>;

    /// Local id bound to a principal.
    async fn resolve_principal(&self, principal: &Principal) -> Result<UserId, RewardsError>;

    /// Profile of a user.
    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, RewardsError>;

    /// Total number of users.
    async fn user_count(&self) -> Result<u64, RewardsError>;

    /// Bump the calculator usage counter and return the new value.
    async fn increment_calculator_usage(&self, user_id: UserId) -> Result<u64, RewardsError>;

    /// Session slots after lazy init and countdown expiry.
    async fn get_sessions(&self, user_id: UserId) -> Result<Vec<Session>, RewardsError>;

    /// Force-unlock the next locked session.
    async fn unlock_next_session(&self, user_id: UserId) -> Result<Session, RewardsError>;

    /// Complete a session (`1..=4`).
    async fn complete_session(
        &self,
        user_id: UserId,
        session_number: i64,
    ) -> Result<SessionCompletion, RewardsError>;

    /// Restore the initial session layout.
    async fn reset_sessions(&self, user_id: UserId) -> Result<Vec<Session>, RewardsError>;

    /// Store a wallet address for `kind` (`metamask` or `trustWallet`).
    async fn update_wallet_address(
        &self,
        user_id: UserId,
        kind: &str,
        address: &str,
    ) -> Result<WalletAddresses, RewardsError>;

    /// Apply a signed balance change and return the new balance.
    async fn update_balance(&self, user_id: UserId, delta: i64) -> Result<i64, RewardsError>;

    /// Debit the balance and record a pending withdrawal.
    async fn request_withdrawal(
        &self,
        user_id: UserId,
        amount: i64,
        wallet_address: &str,
    ) -> Result<Withdrawal, RewardsError>;

    /// Withdrawal history, newest first.
    async fn list_withdrawals(
        &self,
        scope: WithdrawalScope,
    ) -> Result<Vec<WithdrawalSummary>, RewardsError>;

    /// Create a notification.
    async fn add_notification(&self, input: NewNotification)
        -> Result<Notification, RewardsError>;

    /// Mark a notification as sent.
    async fn mark_notification_sent(
        &self,
        id: NotificationId,
    ) -> Result<Notification, RewardsError>;

    /// Delete a notification.
    async fn delete_notification(&self, id: NotificationId) -> Result<(), RewardsError>;

    /// All notifications, newest first.
    async fn list_notifications(&self) -> Result<Vec<Notification>, RewardsError>;

    /// Record a read receipt. Idempotent.
    async fn mark_notification_read(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<(), RewardsError>;

    /// Mark every notification read. Returns how many were newly marked.
    async fn mark_all_notifications_read(&self, user_id: UserId) -> Result<usize, RewardsError>;

    /// Number of notifications the user has not read.
    async fn unread_notification_count(&self, user_id: UserId) -> Result<usize, RewardsError>;

    /// Notifications paired with the user's read state.
    async fn notifications_with_read_status(
        &self,
        user_id: UserId,
    ) -> Result<Vec<NotificationView>, RewardsError>;
}
