//! Request and response bodies.
//!
//! Field names are camelCase on the wire.

use rewards_core::{
    NewNotification, Notification, NotificationPriority, NotificationView, Session,
    UserProfile, WalletAddresses, Withdrawal, WithdrawalSummary,
};
use serde::{Deserialize, Serialize};

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub invite_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRequest {
    /// Invite code of the referrer
    pub referred_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralResponse {
    pub message: String,
    pub recent_amount: i64,
    /// Invite code of the newly created user
    pub invite_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Country name resolved by the client or an edge proxy
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub created: bool,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRequest {
    /// `metamask` or `trustWallet`
    pub wallet_type: String,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub message: String,
    pub wallet_addresses: WalletAddresses,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
    /// Signed delta
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResponse {
    pub calculator_usage: u64,
}

// =============================================================================
// SESSIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub message: String,
    pub session: Session,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSessionRequest {
    /// Missing is reported like any other out-of-range number.
    #[serde(default)]
    pub session_number: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSessionResponse {
    pub message: String,
    pub session: Session,
    pub next_session: Session,
    pub sessions_reset: bool,
}

// =============================================================================
// WITHDRAWALS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    pub amount: i64,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub message: String,
    pub withdrawal: Withdrawal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalsResponse {
    pub withdrawals: Vec<WithdrawalSummary>,
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Admin input. `message` and `image` are accepted as older spellings of
/// `content` and `imageUrl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub priority: Option<NotificationPriority>,
}

impl From<NotificationRequest> for NewNotification {
    fn from(req: NotificationRequest) -> Self {
        NewNotification {
            title: req.title,
            content: req.content.or(req.message).unwrap_or_default(),
            image_url: req.image_url.or(req.image).unwrap_or_default(),
            link: req.link,
            kind: req.kind,
            priority: req.priority,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub message: String,
    pub notification: Notification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationViewsResponse {
    pub notifications: Vec<NotificationView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedReadResponse {
    pub message: String,
    pub marked: usize,
}

// =============================================================================
// HEALTH
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_request_aliases() {
        let req: NotificationRequest = serde_json::from_str(
            r#"{"title":"t","message":"m","image":"uploads/a.png","type":"promo"}"#,
        )
        .unwrap();
        let new = NewNotification::from(req);
        assert_eq!(new.content, "m");
        assert_eq!(new.image_url, "uploads/a.png");
        assert_eq!(new.kind.as_deref(), Some("promo"));
    }

    #[test]
    fn test_notification_request_prefers_content() {
        let req: NotificationRequest =
            serde_json::from_str(r#"{"title":"t","content":"c","message":"m"}"#).unwrap();
        let new = NewNotification::from(req);
        assert_eq!(new.content, "c");
        assert!(new.image_url.is_empty());
    }

    #[test]
    fn test_camel_case_bodies() {
        let req: WalletRequest =
            serde_json::from_str(r#"{"walletType":"metamask","walletAddress":"0x1"}"#).unwrap();
        assert_eq!(req.wallet_type, "metamask");

        let req: CompleteSessionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.session_number.is_none());

        let json = serde_json::to_value(UnreadCountResponse { unread_count: 3 }).unwrap();
        assert_eq!(json["unreadCount"], 3);
    }
}
