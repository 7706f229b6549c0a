//! # Domain Entities
//!
//! The user aggregate with its embedded session slots, withdrawal records
//! and notifications.

use serde::{Deserialize, Serialize};

use super::invariants::SESSION_COUNT;
use super::value_objects::{
    InviteCode, NotificationId, NotificationPriority, SessionPhase, Timestamp, UserId,
    WalletKind, WithdrawalId, WithdrawalStatus,
};

/// One of the four per-user session slots.
///
/// Identity is positional: `session_number` never changes once the slot
/// exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Slot number in `1..=4`.
    pub session_number: u8,
    /// Set while the slot is available to complete (or completed).
    pub unlocked_at: Option<Timestamp>,
    /// Set once the reward was claimed for this cycle.
    pub completed_at: Option<Timestamp>,
    /// Scheduled unlock instant while counting down.
    pub next_unlock_at: Option<Timestamp>,
    /// Lock flag. `true` implies `unlocked_at == None`.
    pub is_locked: bool,
    /// Mirrors `completed_at.is_some()`.
    pub is_claimed: bool,
}

impl Session {
    /// A slot that is locked and not counting down.
    pub fn locked(session_number: u8) -> Self {
        Self {
            session_number,
            unlocked_at: None,
            completed_at: None,
            next_unlock_at: None,
            is_locked: true,
            is_claimed: false,
        }
    }

    /// A slot that is available since `now`.
    pub fn unlocked(session_number: u8, now: Timestamp) -> Self {
        Self {
            unlocked_at: Some(now),
            is_locked: false,
            ..Self::locked(session_number)
        }
    }

    /// Derive the state-machine phase from the timestamps.
    pub fn phase(&self) -> SessionPhase {
        if self.completed_at.is_some() {
            SessionPhase::Completed
        } else if self.unlocked_at.is_some() {
            SessionPhase::UnlockedPending
        } else if self.next_unlock_at.is_some() {
            SessionPhase::LockedCountdown
        } else {
            SessionPhase::LockedNoCountdown
        }
    }
}

/// Fixed set of four session slots, ordered by session number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionSlots([Session; SESSION_COUNT]);

impl SessionSlots {
    /// Build slots from a per-number constructor.
    pub fn from_fn(mut make: impl FnMut(u8) -> Session) -> Self {
        Self(std::array::from_fn(|i| make(i as u8 + 1)))
    }

    /// Slot by number (`1..=4`).
    pub fn get(&self, session_number: u8) -> Option<&Session> {
        self.0.get(usize::from(session_number).checked_sub(1)?)
    }

    /// Mutable slot by number (`1..=4`).
    pub fn get_mut(&mut self, session_number: u8) -> Option<&mut Session> {
        self.0.get_mut(usize::from(session_number).checked_sub(1)?)
    }

    /// Iterate in ascending session order.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.0.iter()
    }

    /// Mutably iterate in ascending session order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.0.iter_mut()
    }

    /// Copy out as a plain vector.
    pub fn to_vec(&self) -> Vec<Session> {
        self.0.to_vec()
    }
}

/// Wallet addresses on file, one per wallet kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAddresses {
    /// MetaMask address.
    pub metamask: Option<String>,
    /// Trust Wallet address.
    pub trust_wallet: Option<String>,
}

impl WalletAddresses {
    /// Replace the address for one kind.
    pub fn set(&mut self, kind: WalletKind, address: String) {
        match kind {
            WalletKind::Metamask => self.metamask = Some(address),
            WalletKind::TrustWallet => self.trust_wallet = Some(address),
        }
    }

    /// Address for one kind.
    pub fn get(&self, kind: WalletKind) -> Option<&str> {
        match kind {
            WalletKind::Metamask => self.metamask.as_deref(),
            WalletKind::TrustWallet => self.trust_wallet.as_deref(),
        }
    }
}

/// A notification the user has read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    /// Notification that was read.
    pub notification_id: NotificationId,
    /// When it was first marked read.
    pub read_at: Timestamp,
}

/// User aggregate. Persisted as a single document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Local identifier.
    pub id: UserId,
    /// Identity provider subject, absent for invite-only users.
    pub external_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Balance in whole reward units.
    pub balance: i64,
    /// Referral bonus accumulated through this user's invite code.
    pub recent_amount: i64,
    /// Session slots; `None` until first read.
    pub sessions: Option<SessionSlots>,
    /// Unique invite code.
    pub invite_code: InviteCode,
    /// Referrer's invite code (informational).
    pub referred_by: Option<InviteCode>,
    /// Read receipts, in the order they were recorded.
    pub read_notifications: Vec<ReadReceipt>,
    /// Wallets on file.
    pub wallet_addresses: WalletAddresses,
    /// Set once any wallet address was stored.
    pub wallet_connected: bool,
    /// Calculator usage counter.
    pub calculator_usage: u64,
    /// Creation time.
    pub created_at: Timestamp,
    /// Optimistic concurrency token, bumped by every save.
    pub version: u64,
}

impl User {
    /// New user with zero balance and no sessions yet.
    pub fn new(invite_code: InviteCode, now: Timestamp) -> Self {
        Self {
            id: UserId::new(),
            external_id: None,
            name: None,
            email: None,
            country: None,
            balance: 0,
            recent_amount: 0,
            sessions: None,
            invite_code,
            referred_by: None,
            read_notifications: Vec::new(),
            wallet_addresses: WalletAddresses::default(),
            wallet_connected: false,
            calculator_usage: 0,
            created_at: now,
            version: 0,
        }
    }

    /// True if the notification has a read receipt.
    pub fn has_read(&self, notification_id: NotificationId) -> bool {
        self.read_notifications
            .iter()
            .any(|r| r.notification_id == notification_id)
    }
}

/// Withdrawal request record. Immutable once created by the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Record identifier.
    pub id: WithdrawalId,
    /// Requesting user.
    pub user_id: UserId,
    /// Debited units.
    pub amount: i64,
    /// Payout destination.
    pub wallet_address: String,
    /// Lifecycle status.
    pub status: WithdrawalStatus,
    /// Creation time.
    pub created_at: Timestamp,
}

impl Withdrawal {
    /// New pending request.
    pub fn pending(user_id: UserId, amount: i64, wallet_address: String, now: Timestamp) -> Self {
        Self {
            id: WithdrawalId::new(),
            user_id,
            amount,
            wallet_address,
            status: WithdrawalStatus::Pending,
            created_at: now,
        }
    }
}

/// Broadcast notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Identifier.
    pub id: NotificationId,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Image location.
    pub image_url: String,
    /// Optional link target.
    pub link: String,
    /// Free-form category, `general` by default.
    #[serde(rename = "type")]
    pub kind: String,
    /// Priority.
    pub priority: NotificationPriority,
    /// Whether it has been sent.
    pub is_sent: bool,
    /// When it was marked sent.
    pub sent_at: Option<Timestamp>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last modification time.
    pub updated_at: Timestamp,
}

/// Input for creating a notification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Headline (required).
    pub title: String,
    /// Body text (required).
    pub content: String,
    /// Image location (required).
    pub image_url: String,
    /// Optional link target.
    #[serde(default)]
    pub link: Option<String>,
    /// Category, `general` when absent.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Priority, `normal` when absent.
    #[serde(default)]
    pub priority: Option<NotificationPriority>,
}

impl NewNotification {
    /// Materialize into a stored, not yet sent notification.
    pub fn into_notification(self, now: Timestamp) -> Notification {
        Notification {
            id: NotificationId::new(),
            title: self.title,
            content: self.content,
            image_url: self.image_url,
            link: self.link.unwrap_or_default(),
            kind: self.kind.unwrap_or_else(|| "general".to_string()),
            priority: self.priority.unwrap_or_default(),
            is_sent: false,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_session_phase_derivation() {
        let now = Utc::now();
        assert_eq!(Session::locked(2).phase(), SessionPhase::LockedNoCountdown);
        assert_eq!(Session::unlocked(1, now).phase(), SessionPhase::UnlockedPending);

        let mut counting = Session::locked(3);
        counting.next_unlock_at = Some(now);
        assert_eq!(counting.phase(), SessionPhase::LockedCountdown);

        let mut done = Session::unlocked(4, now);
        done.completed_at = Some(now);
        assert_eq!(done.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_slots_indexed_by_number() {
        let slots = SessionSlots::from_fn(Session::locked);
        assert_eq!(slots.get(1).unwrap().session_number, 1);
        assert_eq!(slots.get(4).unwrap().session_number, 4);
        assert!(slots.get(0).is_none());
        assert!(slots.get(5).is_none());
    }

    #[test]
    fn test_slots_serialize_as_array() {
        let slots = SessionSlots::from_fn(Session::locked);
        let json = serde_json::to_value(&slots).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[0]["sessionNumber"], 1);
    }

    #[test]
    fn test_wallet_addresses_set() {
        let mut wallets = WalletAddresses::default();
        wallets.set(WalletKind::TrustWallet, "0xT".into());
        assert_eq!(wallets.get(WalletKind::TrustWallet), Some("0xT"));
        assert_eq!(wallets.get(WalletKind::Metamask), None);
    }

    #[test]
    fn test_new_notification_defaults() {
        let n = NewNotification {
            title: "t".into(),
            content: "c".into(),
            image_url: "i.png".into(),
            ..Default::default()
        }
        .into_notification(Utc::now());
        assert_eq!(n.kind, "general");
        assert_eq!(n.priority, NotificationPriority::Normal);
        assert!(!n.is_sent);
    }
}
