// SPDX-License-Identifier: MPL-2.0
//! Timer-driven behaviors against a monotonic clock.
//!
//! Two independent scheduled callbacks: a fixed-interval tick that requests
//! a repaint evaluation, and a bounded stay-on-top assertion armed on every
//! successful insertion. Both take the current time as a plain `Duration`
//! since the overlay epoch, so they are testable without a host window.

use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_TOPMOST_FOR: Duration = Duration::from_secs(3);

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickActions {
    /// Always set: every tick evaluates a repaint (the compositor still
    /// does nothing when the store is clean).
    pub evaluate_repaint: bool,
    /// Set exactly once per armed assertion, on the first tick past its
    /// deadline.
    pub revoke_topmost: bool,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    tick_interval: Duration,
    topmost_for: Duration,
    topmost_until: Option<Duration>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL, DEFAULT_TOPMOST_FOR)
    }
}

impl Scheduler {
    #[must_use]
    pub fn new(tick_interval: Duration, topmost_for: Duration) -> Self {
        Self {
            tick_interval,
            topmost_for,
            topmost_until: None,
        }
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Arms (or re-arms) the stay-on-top assertion for its bounded
    /// duration starting at `now`.
    pub fn arm_topmost(&mut self, now: Duration) {
        self.topmost_until = Some(now + self.topmost_for);
    }

    #[must_use]
    pub fn topmost_armed(&self) -> bool {
        self.topmost_until.is_some()
    }

    /// Processes one tick at monotonic time `now`.
    pub fn tick(&mut self, now: Duration) -> TickActions {
        let mut actions = TickActions {
            evaluate_repaint: true,
            revoke_topmost: false,
        };
        if let Some(deadline) = self.topmost_until {
            if now >= deadline {
                self.topmost_until = None;
                actions.revoke_topmost = true;
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn every_tick_requests_repaint_evaluation() {
        let mut sched = Scheduler::default();
        assert!(sched.tick(at(0)).evaluate_repaint);
        assert!(sched.tick(at(100)).evaluate_repaint);
    }

    #[test]
    fn topmost_revokes_once_after_deadline() {
        let mut sched = Scheduler::new(at(100), at(3000));
        sched.arm_topmost(at(0));

        assert!(!sched.tick(at(2900)).revoke_topmost);
        assert!(sched.tick(at(3000)).revoke_topmost);
        // Already revoked: later ticks stay quiet.
        assert!(!sched.tick(at(3100)).revoke_topmost);
    }

    #[test]
    fn rearming_extends_the_deadline() {
        let mut sched = Scheduler::new(at(100), at(3000));
        sched.arm_topmost(at(0));
        sched.arm_topmost(at(2000));

        assert!(!sched.tick(at(3500)).revoke_topmost);
        assert!(sched.tick(at(5000)).revoke_topmost);
    }

    #[test]
    fn unarmed_scheduler_never_revokes() {
        let mut sched = Scheduler::default();
        assert!(!sched.topmost_armed());
        assert!(!sched.tick(at(10_000)).revoke_topmost);
    }
}
