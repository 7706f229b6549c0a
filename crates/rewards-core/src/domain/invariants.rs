//! # Domain Invariants
//!
//! Constants and input rules shared by the session cycle, the ledger and
//! the service.

use super::entities::SessionSlots;
use super::errors::RewardsError;

/// Number of session slots per user.
pub const SESSION_COUNT: usize = 4;

/// Delay between completing a session and its successor unlocking (6 hours).
pub const DEFAULT_SESSION_COUNTDOWN_SECS: u64 = 6 * 3600;

/// Balance required before any withdrawal is accepted.
pub const MIN_WITHDRAWAL_BALANCE: i64 = 4000;

/// Units credited to a referrer per successful referral.
pub const REFERRAL_BONUS: i64 = 50;

/// Length of generated invite codes.
pub const INVITE_CODE_LEN: usize = 34;

/// Invariant: session numbers are in `1..=4`.
pub fn invariant_session_number(session_number: i64) -> Result<u8, RewardsError> {
    match u8::try_from(session_number) {
        Ok(n) if (1..=SESSION_COUNT as u8).contains(&n) => Ok(n),
        _ => Err(RewardsError::InvalidSessionNumber(session_number)),
    }
}

/// Invariant: withdrawal amounts are strictly positive.
pub fn invariant_positive_amount(amount: i64) -> Result<(), RewardsError> {
    if amount <= 0 {
        return Err(RewardsError::InvalidRequest(
            "Amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// Invariant: wallet addresses are non-blank. Returns the trimmed address.
pub fn invariant_wallet_address(address: &str) -> Result<String, RewardsError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(RewardsError::InvalidRequest(
            "Wallet address is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Invariant: a locked slot never carries an unlock timestamp, and the
/// claim flag mirrors the completion timestamp.
pub fn invariant_slots_consistent(slots: &SessionSlots) -> bool {
    slots.iter().enumerate().all(|(i, s)| {
        usize::from(s.session_number) == i + 1
            && !(s.is_locked && s.unlocked_at.is_some())
            && s.is_claimed == s.completed_at.is_some()
    })
}

/// Invariant: at most one slot is unlocked and not yet completed.
pub fn invariant_single_active(slots: &SessionSlots) -> bool {
    slots
        .iter()
        .filter(|s| s.unlocked_at.is_some() && s.completed_at.is_none())
        .count()
        <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Session;
    use chrono::Utc;

    #[test]
    fn test_session_number_range() {
        assert_eq!(invariant_session_number(1).unwrap(), 1);
        assert_eq!(invariant_session_number(4).unwrap(), 4);
        assert!(invariant_session_number(0).is_err());
        assert!(invariant_session_number(5).is_err());
        assert!(invariant_session_number(-1).is_err());
        assert!(invariant_session_number(260).is_err());
    }

    #[test]
    fn test_positive_amount() {
        assert!(invariant_positive_amount(1).is_ok());
        assert!(invariant_positive_amount(0).is_err());
        assert!(invariant_positive_amount(-5).is_err());
    }

    #[test]
    fn test_wallet_address_trimmed() {
        assert_eq!(invariant_wallet_address("  0xABC ").unwrap(), "0xABC");
        assert!(invariant_wallet_address("   ").is_err());
    }

    #[test]
    fn test_inconsistent_lock_detected() {
        let mut bad = Session::unlocked(2, Utc::now());
        bad.is_locked = true;
        let slots = SessionSlots::from_fn(|n| if n == 2 { bad.clone() } else { Session::locked(n) });
        assert!(!invariant_slots_consistent(&slots));
    }
}
