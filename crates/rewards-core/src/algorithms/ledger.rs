//! # Balance Ledger
//!
//! Checked balance arithmetic. Balances are whole units and never go
//! negative.

use crate::domain::{invariant_positive_amount, RewardsError};

/// Apply a signed `amount` to `balance`.
pub fn credit(balance: i64, amount: i64) -> Result<i64, RewardsError> {
    let next = balance
        .checked_add(amount)
        .ok_or_else(|| RewardsError::InvalidRequest("balance overflow".to_string()))?;
    if next < 0 {
        return Err(RewardsError::InsufficientBalance {
            balance,
            requested: amount.saturating_neg(),
        });
    }
    Ok(next)
}

/// Debit `amount` for a withdrawal.
///
/// The minimum threshold is checked before sufficiency, so a balance under
/// `minimum` always reports [`RewardsError::BelowMinimumThreshold`].
pub fn debit_for_withdrawal(balance: i64, amount: i64, minimum: i64) -> Result<i64, RewardsError> {
    invariant_positive_amount(amount)?;
    if balance < minimum {
        return Err(RewardsError::BelowMinimumThreshold { balance, minimum });
    }
    if balance < amount {
        return Err(RewardsError::InsufficientBalance {
            balance,
            requested: amount,
        });
    }
    Ok(balance - amount)
}
