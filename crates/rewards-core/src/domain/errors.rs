//! # Domain Errors
//!
//! Error types for the rewards core and the coarse taxonomy callers map to
//! transport status codes.

use thiserror::Error;

use super::value_objects::{InviteCode, NotificationId};

/// Coarse error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing user, invite, session or notification.
    NotFound,
    /// Malformed input.
    InvalidRequest,
    /// Session-state precondition violated.
    InvalidState,
    /// Balance too low.
    InsufficientResource,
    /// Concurrent modification or unresolvable uniqueness collision.
    Conflict,
    /// Persistence unavailable.
    UpstreamFailure,
    /// A two-step operation was left half applied.
    PartialFailure,
}

impl ErrorKind {
    /// Stable label, used for metrics and wire codes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::InsufficientResource => "insufficient_resource",
            ErrorKind::Conflict => "conflict",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::PartialFailure => "partial_failure",
        }
    }
}

/// Rewards core error types.
#[derive(Debug, Error)]
pub enum RewardsError {
    /// No user matches the given identity.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// No user owns the invite code.
    #[error("Invite not found: {0}")]
    InviteNotFound(InviteCode),

    /// Referral names an invite code nobody owns.
    #[error("Invalid referrer invite code: {0}")]
    UnknownReferrer(InviteCode),

    /// Notification does not exist.
    #[error("Notification not found: {0}")]
    NotificationNotFound(NotificationId),

    /// Malformed input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unsupported wallet kind.
    #[error("Invalid wallet kind: {0}")]
    InvalidWalletKind(String),

    /// Session number outside `1..=4`.
    #[error("Valid session number (1-4) is required, got {0}")]
    InvalidSessionNumber(i64),

    /// Completion attempted before the slot was unlocked.
    #[error("Session {session_number} is not unlocked yet")]
    SessionNotUnlocked {
        /// Target slot
        session_number: u8,
    },

    /// Completion attempted twice in one cycle.
    #[error("Session {session_number} is already completed")]
    AlreadyCompleted {
        /// Target slot
        session_number: u8,
    },

    /// Every slot is already unlocked.
    #[error("No more sessions to unlock")]
    NoSessionsAvailable,

    /// Balance is lower than the requested amount.
    #[error("Insufficient balance: {balance} available, {requested} requested")]
    InsufficientBalance {
        /// Current balance
        balance: i64,
        /// Requested debit
        requested: i64,
    },

    /// Balance is below the withdrawal threshold.
    #[error("You must have at least {minimum} balance to withdraw (current: {balance})")]
    BelowMinimumThreshold {
        /// Current balance
        balance: i64,
        /// Required minimum
        minimum: i64,
    },

    /// Concurrent modification or exhausted uniqueness retries.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence layer failure.
    #[error("Store unavailable: {0}")]
    Upstream(String),

    /// First step of a two-step operation applied, second step and its
    /// compensation both failed.
    #[error("Operation partially applied: {0}")]
    PartialFailure(String),
}

impl RewardsError {
    /// Taxonomy bucket for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RewardsError::UserNotFound(_)
            | RewardsError::InviteNotFound(_)
            | RewardsError::UnknownReferrer(_)
            | RewardsError::NotificationNotFound(_) => ErrorKind::NotFound,
            RewardsError::InvalidRequest(_)
            | RewardsError::InvalidWalletKind(_)
            | RewardsError::InvalidSessionNumber(_) => ErrorKind::InvalidRequest,
            RewardsError::SessionNotUnlocked { .. }
            | RewardsError::AlreadyCompleted { .. }
            | RewardsError::NoSessionsAvailable => ErrorKind::InvalidState,
            RewardsError::InsufficientBalance { .. }
            | RewardsError::BelowMinimumThreshold { .. } => ErrorKind::InsufficientResource,
            RewardsError::Conflict(_) => ErrorKind::Conflict,
            RewardsError::Upstream(_) => ErrorKind::UpstreamFailure,
            RewardsError::PartialFailure(_) => ErrorKind::PartialFailure,
        }
    }
}
