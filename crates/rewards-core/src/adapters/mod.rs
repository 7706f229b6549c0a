//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the rewards core.

mod clock;
mod identity;
mod invite_codes;
mod memory_store;

pub use clock::{ManualClock, SystemClock};
pub use identity::StaticTokenIdentity;
pub use invite_codes::{RandomInviteCodes, ScriptedInviteCodes};
pub use memory_store::InMemoryStore;
