//! # Algorithms Module
//!
//! Pure logic for the rewards core: the session cycle, balance arithmetic
//! and invite code generation.

pub mod invite_code;
pub mod ledger;
pub mod session_cycle;

pub use invite_code::generate_invite_code;
pub use ledger::{credit, debit_for_withdrawal};
