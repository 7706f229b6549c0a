//! # Rewards Configuration
//!
//! Tunables for the session cycle, ledger and referral engine.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::domain::{
    DEFAULT_SESSION_COUNTDOWN_SECS, INVITE_CODE_LEN, MIN_WITHDRAWAL_BALANCE, REFERRAL_BONUS,
};

/// Invite code uniqueness retries before giving up with `Conflict`.
pub const DEFAULT_MAX_INVITE_ATTEMPTS: u32 = 16;

/// Upper bound for the session countdown (30 days).
pub const MAX_SESSION_COUNTDOWN_SECS: u64 = 30 * 24 * 3600;

/// Configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable present but unparsable.
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name
        name: String,
        /// Raw value
        value: String,
    },

    /// Parsed but out of range.
    #[error("{0}")]
    OutOfRange(String),
}

/// Rewards core configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Delay between completing a session and its successor unlocking.
    pub session_countdown_secs: u64,

    /// Balance required before a withdrawal is accepted.
    pub min_withdrawal_balance: i64,

    /// Units credited to a referrer per referral.
    pub referral_bonus: i64,

    /// Units credited per completed session. Zero disables the credit.
    pub session_reward: i64,

    /// Length of generated invite codes.
    pub invite_code_len: usize,

    /// Invite code uniqueness retries.
    pub max_invite_attempts: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            session_countdown_secs: DEFAULT_SESSION_COUNTDOWN_SECS,
            min_withdrawal_balance: MIN_WITHDRAWAL_BALANCE,
            referral_bonus: REFERRAL_BONUS,
            session_reward: 0,
            invite_code_len: INVITE_CODE_LEN,
            max_invite_attempts: DEFAULT_MAX_INVITE_ATTEMPTS,
        }
    }
}

impl RewardsConfig {
    /// Create a config for testing (few retries).
    pub fn for_testing() -> Self {
        Self {
            max_invite_attempts: 4,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REWARDS_SESSION_COUNTDOWN_SECS` (default: 21600)
    /// - `REWARDS_MIN_WITHDRAWAL_BALANCE` (default: 4000)
    /// - `REWARDS_REFERRAL_BONUS` (default: 50)
    /// - `REWARDS_SESSION_REWARD` (default: 0)
    /// - `REWARDS_MAX_INVITE_ATTEMPTS` (default: 16)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            session_countdown_secs: parse_var(
                &lookup,
                "REWARDS_SESSION_COUNTDOWN_SECS",
                defaults.session_countdown_secs,
            )?,
            min_withdrawal_balance: parse_var(
                &lookup,
                "REWARDS_MIN_WITHDRAWAL_BALANCE",
                defaults.min_withdrawal_balance,
            )?,
            referral_bonus: parse_var(&lookup, "REWARDS_REFERRAL_BONUS", defaults.referral_bonus)?,
            session_reward: parse_var(&lookup, "REWARDS_SESSION_REWARD", defaults.session_reward)?,
            invite_code_len: defaults.invite_code_len,
            max_invite_attempts: parse_var(
                &lookup,
                "REWARDS_MAX_INVITE_ATTEMPTS",
                defaults.max_invite_attempts,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_countdown_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "session countdown must be positive".to_string(),
            ));
        }
        if self.session_countdown_secs > MAX_SESSION_COUNTDOWN_SECS {
            return Err(ConfigError::OutOfRange(format!(
                "session countdown exceeds {MAX_SESSION_COUNTDOWN_SECS}s"
            )));
        }
        if self.min_withdrawal_balance < 0 || self.referral_bonus < 0 || self.session_reward < 0 {
            return Err(ConfigError::OutOfRange(
                "balances and rewards must not be negative".to_string(),
            ));
        }
        if self.max_invite_attempts == 0 || self.invite_code_len == 0 {
            return Err(ConfigError::OutOfRange(
                "invite code length and attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Countdown as a chrono duration.
    pub fn session_countdown(&self) -> Duration {
        let secs = self.session_countdown_secs.min(MAX_SESSION_COUNTDOWN_SECS);
        Duration::seconds(secs as i64)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
    }
}
