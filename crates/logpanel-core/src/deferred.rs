//! One-shot deferred action with cancellation.
//!
//! Time is passed in by the caller, so the action is driven by whatever tick
//! the host already has (the TUI polls it once per frame) and tests can use
//! synthetic instants.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Fired,
    Cancelled,
}

/// An action due once `delay` has elapsed since it was scheduled.
#[derive(Debug, Clone)]
pub struct Deferred {
    deadline: Instant,
    state: State,
}

impl Deferred {
    pub fn new(delay: Duration, now: Instant) -> Self {
        Self { deadline: now + delay, state: State::Pending }
    }

    /// Returns `true` exactly once: on the first poll at or after the
    /// deadline, unless the action was cancelled first.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.state == State::Pending && now >= self.deadline {
            self.state = State::Fired;
            return true;
        }
        false
    }

    /// Cancel a pending action. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.state == State::Pending {
            self.state = State::Cancelled;
            return true;
        }
        false
    }

    pub fn is_pending(&self) -> bool {
        self.state == State::Pending
    }

    /// Time left before the action fires; `None` unless pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.is_pending().then(|| self.deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(2000);

    #[test]
    fn fires_once_after_deadline() {
        let t0 = Instant::now();
        let mut action = Deferred::new(DELAY, t0);

        assert!(!action.poll(t0));
        assert!(!action.poll(t0 + Duration::from_millis(1999)));
        assert!(action.poll(t0 + DELAY));
        assert!(!action.poll(t0 + DELAY * 2));
        assert!(!action.is_pending());
    }

    #[test]
    fn cancelled_action_never_fires() {
        let t0 = Instant::now();
        let mut action = Deferred::new(DELAY, t0);

        assert!(action.cancel());
        assert!(!action.cancel());
        assert!(!action.poll(t0 + DELAY * 10));
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let t0 = Instant::now();
        let mut action = Deferred::new(Duration::ZERO, t0);
        assert!(action.poll(t0));
        assert!(!action.cancel());
    }

    #[test]
    fn remaining_counts_down() {
        let t0 = Instant::now();
        let action = Deferred::new(DELAY, t0);
        assert_eq!(action.remaining(t0 + Duration::from_millis(500)), Some(Duration::from_millis(1500)));
        assert_eq!(action.remaining(t0 + DELAY * 3), Some(Duration::ZERO));
    }
}
