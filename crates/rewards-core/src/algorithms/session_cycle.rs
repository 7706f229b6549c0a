//! # Session Cycle
//!
//! Pure transitions over a user's four session slots.
//!
//! Countdown expiry is lazy: callers run [`normalize`] before inspecting
//! or mutating slots, so an elapsed countdown is never observed as locked.

use chrono::Duration;

use crate::domain::{
    RewardsError, Session, SessionCompletion, SessionSlots, Timestamp, SESSION_COUNT,
};

/// Fresh-cycle layout: slot 1 unlocked at `now`, slots 2-4 locked.
pub fn initialize(now: Timestamp) -> SessionSlots {
    SessionSlots::from_fn(|n| {
        if n == 1 {
            Session::unlocked(n, now)
        } else {
            Session::locked(n)
        }
    })
}

/// Lazily create the slots on first access. Existing slots are returned
/// untouched.
pub fn ensure_initialized(sessions: &mut Option<SessionSlots>, now: Timestamp) -> &mut SessionSlots {
    sessions.get_or_insert_with(|| initialize(now))
}

/// Unlock every counting-down slot whose `next_unlock_at <= now`.
///
/// Returns the number of slots that unlocked. Idempotent before expiry.
pub fn normalize(slots: &mut SessionSlots, now: Timestamp) -> usize {
    let mut unlocked = 0;
    for slot in slots.iter_mut() {
        match slot.next_unlock_at {
            Some(at) if at <= now && slot.unlocked_at.is_none() => {
                slot.unlocked_at = Some(now);
                slot.next_unlock_at = None;
                slot.is_locked = false;
                unlocked += 1;
            }
            _ => {}
        }
    }
    unlocked
}

/// Complete session `session_number` and schedule its successor.
///
/// Completing slot 4 restarts the cycle: slot 1 counts down to
/// `now + countdown`, slots 2-4 go back to locked without countdown.
pub fn complete(
    slots: &mut SessionSlots,
    session_number: u8,
    now: Timestamp,
    countdown: Duration,
) -> Result<SessionCompletion, RewardsError> {
    let target = slots
        .get_mut(session_number)
        .ok_or(RewardsError::InvalidSessionNumber(i64::from(session_number)))?;

    if target.unlocked_at.is_none() {
        return Err(RewardsError::SessionNotUnlocked { session_number });
    }
    if target.completed_at.is_some() {
        return Err(RewardsError::AlreadyCompleted { session_number });
    }

    target.completed_at = Some(now);
    target.is_claimed = true;
    let completed_session = target.clone();

    let next_unlock_at = now + countdown;
    let cycle_reset = usize::from(session_number) == SESSION_COUNT;

    let next_number = if cycle_reset {
        *slots = SessionSlots::from_fn(Session::locked);
        1
    } else {
        session_number + 1
    };

    let next = slots
        .get_mut(next_number)
        .ok_or(RewardsError::InvalidSessionNumber(i64::from(next_number)))?;
    *next = Session {
        next_unlock_at: Some(next_unlock_at),
        ..Session::locked(next_number)
    };
    let next_session = next.clone();

    Ok(SessionCompletion {
        completed_session,
        next_session,
        cycle_reset,
    })
}

/// Force-unlock the first slot (ascending) that has no `unlocked_at`.
///
/// Any pending countdown on that slot is dropped.
pub fn unlock_next(slots: &mut SessionSlots, now: Timestamp) -> Result<Session, RewardsError> {
    let slot = slots
        .iter_mut()
        .find(|s| s.unlocked_at.is_none())
        .ok_or(RewardsError::NoSessionsAvailable)?;

    slot.unlocked_at = Some(now);
    slot.next_unlock_at = None;
    slot.is_locked = false;
    Ok(slot.clone())
}

/// Put every slot back into the initialization layout.
pub fn reset(slots: &mut SessionSlots, now: Timestamp) {
    *slots = initialize(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{invariant_single_active, invariant_slots_consistent, SessionPhase};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn six_hours() -> Duration {
        Duration::hours(6)
    }

    #[test]
    fn test_initialize_layout() {
        let slots = initialize(t0());
        assert_eq!(slots.get(1).unwrap().phase(), SessionPhase::UnlockedPending);
        assert_eq!(slots.get(1).unwrap().unlocked_at, Some(t0()));
        for n in 2..=4 {
            assert_eq!(slots.get(n).unwrap().phase(), SessionPhase::LockedNoCountdown);
            assert!(slots.get(n).unwrap().is_locked);
        }
    }

    #[test]
    fn test_ensure_initialized_only_once() {
        let mut sessions = None;
        ensure_initialized(&mut sessions, t0());
        let later = t0() + Duration::hours(1);
        let slots = ensure_initialized(&mut sessions, later);
        assert_eq!(slots.get(1).unwrap().unlocked_at, Some(t0()));
    }

    #[test]
    fn test_complete_schedules_successor() {
        let mut slots = initialize(t0());
        let now = t0() + Duration::minutes(5);
        let before = slots.clone();

        let result = complete(&mut slots, 1, now, six_hours()).unwrap();

        assert!(!result.cycle_reset);
        assert_eq!(result.completed_session.completed_at, Some(now));
        assert!(result.completed_session.is_claimed);
        assert_eq!(result.next_session.session_number, 2);
        assert_eq!(result.next_session.next_unlock_at, Some(now + six_hours()));
        assert_eq!(slots.get(2).unwrap().phase(), SessionPhase::LockedCountdown);
        assert_eq!(slots.get(3), before.get(3));
        assert_eq!(slots.get(4), before.get(4));
    }

    #[test]
    fn test_complete_session_four_resets_cycle() {
        let mut slots = initialize(t0());
        let mut now = t0();
        for n in 1..=3u8 {
            complete(&mut slots, n, now, six_hours()).unwrap();
            now += six_hours();
            assert_eq!(normalize(&mut slots, now), 1);
        }

        let result = complete(&mut slots, 4, now, six_hours()).unwrap();
        assert!(result.cycle_reset);
        assert_eq!(result.completed_session.session_number, 4);
        assert_eq!(result.completed_session.completed_at, Some(now));
        assert_eq!(result.next_session.session_number, 1);

        let first = slots.get(1).unwrap();
        assert_eq!(first.phase(), SessionPhase::LockedCountdown);
        assert_eq!(first.next_unlock_at, Some(now + six_hours()));
        for slot in slots.iter() {
            assert!(slot.completed_at.is_none());
            assert!(!slot.is_claimed);
            assert!(slot.unlocked_at.is_none());
        }
        for n in 2..=4 {
            assert_eq!(slots.get(n).unwrap().phase(), SessionPhase::LockedNoCountdown);
        }
    }

    #[test]
    fn test_double_completion_rejected() {
        let mut slots = initialize(t0());
        complete(&mut slots, 1, t0(), six_hours()).unwrap();
        let err = complete(&mut slots, 1, t0(), six_hours()).unwrap_err();
        assert!(matches!(err, RewardsError::AlreadyCompleted { session_number: 1 }));
    }

    #[test]
    fn test_complete_locked_session_rejected() {
        let mut slots = initialize(t0());
        let err = complete(&mut slots, 3, t0(), six_hours()).unwrap_err();
        assert!(matches!(err, RewardsError::SessionNotUnlocked { session_number: 3 }));
    }

    #[test]
    fn test_normalize_respects_countdown() {
        let mut slots = initialize(t0());
        complete(&mut slots, 1, t0(), six_hours()).unwrap();

        let almost = t0() + six_hours() - Duration::seconds(1);
        assert_eq!(normalize(&mut slots, almost), 0);
        assert_eq!(normalize(&mut slots, almost), 0);
        assert!(slots.get(2).unwrap().is_locked);

        let due = t0() + six_hours();
        assert_eq!(normalize(&mut slots, due), 1);
        let second = slots.get(2).unwrap();
        assert_eq!(second.phase(), SessionPhase::UnlockedPending);
        assert_eq!(second.unlocked_at, Some(due));
        assert!(second.next_unlock_at.is_none());
        assert!(!second.is_locked);
    }

    #[test]
    fn test_unlock_next_in_order() {
        let mut slots = initialize(t0());
        let unlocked = unlock_next(&mut slots, t0()).unwrap();
        assert_eq!(unlocked.session_number, 2);
        assert!(!unlocked.is_locked);

        unlock_next(&mut slots, t0()).unwrap();
        unlock_next(&mut slots, t0()).unwrap();
        assert!(matches!(
            unlock_next(&mut slots, t0()),
            Err(RewardsError::NoSessionsAvailable)
        ));
    }

    #[test]
    fn test_unlock_next_bypasses_countdown() {
        let mut slots = initialize(t0());
        complete(&mut slots, 1, t0(), six_hours()).unwrap();
        let unlocked = unlock_next(&mut slots, t0()).unwrap();
        assert_eq!(unlocked.session_number, 2);
        assert!(unlocked.next_unlock_at.is_none());
        assert!(complete(&mut slots, 2, t0(), six_hours()).is_ok());
    }

    #[test]
    fn test_reset_restores_initial_layout() {
        let mut slots = initialize(t0());
        complete(&mut slots, 1, t0(), six_hours()).unwrap();
        let later = t0() + Duration::days(1);
        reset(&mut slots, later);
        assert_eq!(slots, initialize(later));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Complete(u8),
        UnlockNext,
        Advance(i64),
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u8..=4).prop_map(Op::Complete),
            Just(Op::UnlockNext),
            (0i64..=8 * 3600).prop_map(Op::Advance),
            Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn prop_slots_stay_consistent(ops in proptest::collection::vec(op(), 0..64)) {
            let mut now = t0();
            let mut slots = initialize(now);
            for op in ops {
                normalize(&mut slots, now);
                match op {
                    Op::Complete(n) => { let _ = complete(&mut slots, n, now, six_hours()); }
                    Op::UnlockNext => { let _ = unlock_next(&mut slots, now); }
                    Op::Advance(secs) => now += Duration::seconds(secs),
                    Op::Reset => reset(&mut slots, now),
                }
                prop_assert!(invariant_slots_consistent(&slots));
            }
        }

        #[test]
        fn prop_single_active_without_forced_unlocks(
            steps in proptest::collection::vec((1u8..=4, 0i64..=8 * 3600), 0..64)
        ) {
            let mut now = t0();
            let mut slots = initialize(now);
            for (n, secs) in steps {
                now += Duration::seconds(secs);
                normalize(&mut slots, now);
                let _ = complete(&mut slots, n, now, six_hours());
                prop_assert!(invariant_single_active(&slots));
            }
        }

        #[test]
        fn prop_completion_schedules_exactly_countdown(offset in 0i64..1_000_000) {
            let now = t0() + Duration::seconds(offset);
            let mut slots = initialize(t0());
            let result = complete(&mut slots, 1, now, six_hours()).unwrap();
            prop_assert_eq!(result.next_session.next_unlock_at, Some(now + six_hours()));
        }
    }
}
