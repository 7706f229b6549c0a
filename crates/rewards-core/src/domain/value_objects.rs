//! # Domain Value Objects
//!
//! Identifiers, enums and operation results for the rewards core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::entities::{Notification, Session, User, WalletAddresses};
use super::errors::RewardsError;

/// Instant type used for every timestamp in the domain.
pub type Timestamp = DateTime<Utc>;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = RewardsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| RewardsError::InvalidRequest(format!("invalid id {s:?}: {e}")))
            }
        }
    };
}

uuid_id!(
    /// Local user identifier.
    UserId
);
uuid_id!(
    /// Withdrawal record identifier.
    WithdrawalId
);
uuid_id!(
    /// Notification identifier.
    NotificationId
);

/// Invite code identifying a user for referrals.
///
/// Lookups accept any string; only generated codes are guaranteed to be
/// 34 alphanumeric characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Wrap a raw code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the code has the generated shape (`len` ASCII alphanumerics).
    pub fn is_well_formed(&self, len: usize) -> bool {
        self.0.len() == len && self.0.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supported wallet providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletKind {
    /// MetaMask browser wallet.
    #[serde(rename = "metamask")]
    Metamask,
    /// Trust Wallet mobile wallet.
    #[serde(rename = "trustWallet")]
    TrustWallet,
}

impl WalletKind {
    /// Wire name of the wallet kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletKind::Metamask => "metamask",
            WalletKind::TrustWallet => "trustWallet",
        }
    }
}

impl FromStr for WalletKind {
    type Err = RewardsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metamask" => Ok(WalletKind::Metamask),
            "trustWallet" => Ok(WalletKind::TrustWallet),
            other => Err(RewardsError::InvalidWalletKind(other.to_string())),
        }
    }
}

/// Lifecycle of a withdrawal request. The core only ever creates `Pending`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Awaiting administrative review.
    Pending,
    /// Paid out.
    Approved,
    /// Refused by an administrator.
    Rejected,
}

/// Which withdrawals a caller may list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawalScope {
    /// Only the caller's own withdrawals.
    Own(UserId),
    /// Every withdrawal (administrators).
    All,
}

/// Notification priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// Highlighted.
    High,
}

/// Observable phase of a session slot, derived from its timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    /// Locked and waiting for its predecessor.
    LockedNoCountdown,
    /// Locked with a scheduled unlock instant.
    LockedCountdown,
    /// Available to complete.
    UnlockedPending,
    /// Reward claimed for this cycle.
    Completed,
}

/// Authenticated identity handed over by the external identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Provider-side subject identifier.
    pub external_id: String,
    /// Email claim, if present.
    pub email: Option<String>,
    /// Display name claim, if present.
    pub name: Option<String>,
    /// Administrator role.
    #[serde(default)]
    pub is_admin: bool,
}

impl Principal {
    /// Regular (non-admin) principal.
    pub fn user(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            email: None,
            name: None,
            is_admin: false,
        }
    }

    /// Administrator principal.
    pub fn admin(external_id: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::user(external_id)
        }
    }
}

/// Public view of an invite code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteDetails {
    /// The code that was looked up.
    pub invite_code: InviteCode,
    /// Bonus units earned through this code.
    pub recent_amount: i64,
}

/// Result of a processed referral.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralOutcome {
    /// Referrer's accumulated referral bonus after crediting.
    pub recent_amount: i64,
    /// Invite code of the newly created user.
    pub invite_code: InviteCode,
}

/// Result of completing a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCompletion {
    /// The completed slot as it was at completion time.
    pub completed_session: Session,
    /// The successor slot after scheduling its countdown.
    pub next_session: Session,
    /// True when session 4 was completed and the cycle restarted.
    pub cycle_reset: bool,
}

/// Profile returned to the owning user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Local identifier.
    pub id: UserId,
    /// Identity provider subject.
    pub external_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Own invite code.
    pub invite_code: InviteCode,
    /// Invite code of the referrer.
    pub referred_by: Option<InviteCode>,
    /// Accumulated referral bonus.
    pub recent_amount: i64,
    /// Current balance.
    pub balance: i64,
    /// Wallets on file.
    pub wallet_addresses: WalletAddresses,
    /// Calculator usage counter.
    pub calculator_usage: u64,
    /// Account creation time.
    pub created_at: Timestamp,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            external_id: user.external_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            country: user.country.clone(),
            invite_code: user.invite_code.clone(),
            referred_by: user.referred_by.clone(),
            recent_amount: user.recent_amount,
            balance: user.balance,
            wallet_addresses: user.wallet_addresses.clone(),
            calculator_usage: user.calculator_usage,
            created_at: user.created_at,
        }
    }
}

/// Withdrawal history row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalSummary {
    /// Creation date, `YYYY-MM-DD` (UTC).
    pub date: String,
    /// Requested units.
    pub amount: i64,
    /// Name of the requesting user, if known.
    pub user_name: Option<String>,
    /// Current status.
    pub status: WithdrawalStatus,
}

/// Notification paired with the caller's read state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    /// The notification.
    #[serde(flatten)]
    pub notification: Notification,
    /// Whether the caller has read it.
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_kind_parse() {
        assert_eq!("metamask".parse::<WalletKind>().unwrap(), WalletKind::Metamask);
        assert_eq!(
            "trustWallet".parse::<WalletKind>().unwrap(),
            WalletKind::TrustWallet
        );
        assert!(matches!(
            "ledger".parse::<WalletKind>(),
            Err(RewardsError::InvalidWalletKind(_))
        ));
    }

    #[test]
    fn test_invite_code_shape() {
        let code = InviteCode::new("a".repeat(34));
        assert!(code.is_well_formed(34));
        assert!(!InviteCode::new("short").is_well_formed(34));
        assert!(!InviteCode::new(format!("{}!", "a".repeat(33))).is_well_formed(34));
    }

    #[test]
    fn test_user_id_roundtrip_display() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }

    #[test]
    fn test_withdrawal_status_wire_name() {
        let json = serde_json::to_string(&WithdrawalStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_admin_principal() {
        assert!(Principal::admin("root").is_admin);
        assert!(!Principal::user("alice").is_admin);
    }
}
