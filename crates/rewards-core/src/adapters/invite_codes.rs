//! Invite Code Sources

use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::algorithms::generate_invite_code;
use crate::domain::{InviteCode, INVITE_CODE_LEN};
use crate::ports::outbound::InviteCodeSource;

/// Thread-local RNG backed source.
#[derive(Clone, Copy, Debug)]
pub struct RandomInviteCodes {
    len: usize,
}

impl RandomInviteCodes {
    /// Codes of `len` characters.
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomInviteCodes {
    fn default() -> Self {
        Self::new(INVITE_CODE_LEN)
    }
}

impl InviteCodeSource for RandomInviteCodes {
    fn generate(&self) -> InviteCode {
        generate_invite_code(&mut rand::thread_rng(), self.len)
    }
}

/// Replays a fixed list of codes, then falls back to random ones.
///
/// Used to force collisions in tests.
#[derive(Debug, Default)]
pub struct ScriptedInviteCodes {
    queue: Mutex<VecDeque<InviteCode>>,
    fallback: RandomInviteCodes,
}

impl ScriptedInviteCodes {
    /// Replay `codes` in order.
    pub fn new(codes: impl IntoIterator<Item = InviteCode>) -> Self {
        Self {
            queue: Mutex::new(codes.into_iter().collect()),
            fallback: RandomInviteCodes::default(),
        }
    }

    /// Codes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

impl InviteCodeSource for ScriptedInviteCodes {
    fn generate(&self) -> InviteCode {
        self.queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_codes_well_formed() {
        let source = RandomInviteCodes::default();
        assert!(source.generate().is_well_formed(INVITE_CODE_LEN));
    }

    #[test]
    fn test_scripted_then_random() {
        let source = ScriptedInviteCodes::new([InviteCode::new("first")]);
        assert_eq!(source.generate().as_str(), "first");
        assert_eq!(source.remaining(), 0);
        assert!(source.generate().is_well_formed(INVITE_CODE_LEN));
    }
}
