//! # Rewards Core
//!
//! Gamified rewards backend: invite codes, referral bonuses, a four-slot
//! session unlock cycle, a balance ledger, withdrawals and notifications.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Session Cycle
//!
//! | Phase | Condition |
//! |-------|-----------|
//! | Locked | `unlocked_at` and `next_unlock_at` unset |
//! | Counting down | `next_unlock_at` set, unlocks lazily once it passes |
//! | Unlocked | `unlocked_at` set, `completed_at` unset |
//! | Completed | `completed_at` set until the cycle restarts |
//!
//! Completing slot `n < 4` schedules slot `n + 1` after the configured
//! countdown. Completing slot 4 resets every slot and schedules slot 1.
//!
//! ## Consistency
//!
//! - Every user mutation runs under a per-user async lock
//! - Stores reject saves with a stale `version`
//! - Referral and withdrawal compensate their first step on failure and
//!   report [`RewardsError::PartialFailure`] when compensation fails too
//!
//! ## Module Structure
//!
//! ```text
//! rewards-core/
//! ├── domain/          # User, Session, Withdrawal, Notification, errors
//! ├── algorithms/      # Session transitions, ledger arithmetic, invite codes
//! ├── ports/           # RewardsApi, stores, clock, identity
//! ├── adapters/        # In-memory store, clocks, invite code sources
//! ├── application/     # RewardsService, per-user locks
//! └── config.rs        # RewardsConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{
    InMemoryStore, ManualClock, RandomInviteCodes, ScriptedInviteCodes, StaticTokenIdentity,
    SystemClock,
};
pub use application::{RewardsService, UserLocks};
pub use config::{ConfigError, RewardsConfig};
pub use domain::{
    ErrorKind, InviteCode, InviteDetails, NewNotification, Notification, NotificationId,
    NotificationPriority, NotificationView, Principal, ReferralOutcome, RewardsError, Session,
    SessionCompletion, SessionPhase, Timestamp, User, UserId, UserProfile, WalletAddresses,
    WalletKind, Withdrawal, WithdrawalId, WithdrawalScope, WithdrawalStatus, WithdrawalSummary,
    MIN_WITHDRAWAL_BALANCE, REFERRAL_BONUS, SESSION_COUNT,
};
pub use ports::{
    Clock, IdentityProvider, InviteCodeSource, NotificationStore, RewardsApi, StoreError,
    UserStore, WithdrawalStore,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
