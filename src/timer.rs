// SPDX-License-Identifier: GPL-3.0-only

//! Single-shot timers driven by explicit timestamps.
//!
//! The controller never sleeps or spawns; the host calls `poll(now)` from its
//! event loop and any deadline that has passed fires exactly once. Scheduling
//! a deadline that is already pending replaces it (cancel-and-reschedule), so
//! only the last event of a burst takes effect.

use std::time::{Duration, Instant};

use crate::state::Viewport;

// ============================================================================
// Deadline
// ============================================================================

/// A cancellable single-shot deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline {
    fires_at: Option<Instant>,
}

impl Deadline {
    /// Creates an idle deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the deadline `delay` after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.fires_at = Some(now + delay);
    }

    /// Cancels the pending deadline, if any.
    ///
    /// Returns `true` if a deadline was pending.
    pub fn cancel(&mut self) -> bool {
        self.fires_at.take().is_some()
    }

    /// Returns `true` if the deadline is scheduled and has not fired.
    pub fn is_pending(&self) -> bool {
        self.fires_at.is_some()
    }

    /// Returns when the deadline will fire.
    pub fn fires_at(&self) -> Option<Instant> {
        self.fires_at
    }

    /// Fires the deadline if `now` has reached it.
    ///
    /// Returns `true` once, on the poll that observes the expiry.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.fires_at {
            Some(at) if now >= at => {
                self.fires_at = None;
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Resize Settle
// ============================================================================

/// A settled viewport change: the size before the burst and the final size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportChange {
    pub from: Viewport,
    pub to: Viewport,
}

/// Debounces viewport resize bursts.
///
/// The first event of a burst records the baseline (the viewport the overlay
/// was last laid out against); every event updates the target and pushes the
/// deadline back. When the burst settles, one [`ViewportChange`] comes out.
#[derive(Debug, Clone, Default)]
pub struct ResizeSettle {
    delay: Duration,
    baseline: Option<Viewport>,
    target: Option<Viewport>,
    deadline: Deadline,
}

impl ResizeSettle {
    /// Creates a debouncer that settles after `delay` without events.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Records a resize event.
    ///
    /// `current` is only used when this event starts a new burst.
    pub fn record(&mut self, current: Viewport, new: Viewport, now: Instant) {
        if self.baseline.is_none() {
            self.baseline = Some(current);
        }
        self.target = Some(new);
        self.deadline.schedule(now, self.delay);
    }

    /// Returns `true` while a burst is waiting to settle.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_pending()
    }

    /// When the current burst settles, if one is pending.
    pub fn fires_at(&self) -> Option<Instant> {
        self.deadline.fires_at()
    }

    /// Returns the settled change once the deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<ViewportChange> {
        if !self.deadline.fire_if_due(now) {
            return None;
        }
        match (self.baseline.take(), self.target.take()) {
            (Some(from), Some(to)) => Some(ViewportChange { from, to }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: Deadline fires once after the delay
    #[test]
    fn test_deadline_fires_once() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::from_millis(5000));

        assert!(!deadline.fire_if_due(start + Duration::from_millis(4999)));
        assert!(deadline.fire_if_due(start + Duration::from_millis(5000)));
        assert!(
            !deadline.fire_if_due(start + Duration::from_millis(9000)),
            "A fired deadline must not fire again"
        );
    }

    /// Test: Cancelled deadline never fires
    #[test]
    fn test_deadline_cancel() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::from_millis(10));

        assert!(deadline.cancel());
        assert!(!deadline.cancel(), "Second cancel has nothing to cancel");
        assert!(!deadline.fire_if_due(start + Duration::from_secs(1)));
    }

    /// Test: Rescheduling pushes the deadline back
    #[test]
    fn test_deadline_reschedule() {
        let start = Instant::now();
        let mut deadline = Deadline::new();
        deadline.schedule(start, Duration::from_millis(100));
        deadline.schedule(start + Duration::from_millis(80), Duration::from_millis(100));

        assert!(!deadline.fire_if_due(start + Duration::from_millis(120)));
        assert!(deadline.fire_if_due(start + Duration::from_millis(180)));
    }

    /// Test: A burst yields one change from the first baseline to the last size
    #[test]
    fn test_resize_settle_burst() {
        let start = Instant::now();
        let mut settle = ResizeSettle::new(Duration::from_millis(170));
        let original = Viewport::new(1280.0, 800.0);

        settle.record(original, Viewport::new(1200.0, 800.0), start);
        settle.record(Viewport::new(1200.0, 800.0), Viewport::new(1100.0, 700.0), start + Duration::from_millis(50));
        settle.record(Viewport::new(1100.0, 700.0), Viewport::new(1000.0, 600.0), start + Duration::from_millis(100));

        assert!(settle.take_due(start + Duration::from_millis(200)).is_none());

        let change = settle.take_due(start + Duration::from_millis(270));
        assert_eq!(
            change,
            Some(ViewportChange {
                from: original,
                to: Viewport::new(1000.0, 600.0),
            })
        );
        assert!(!settle.is_pending());
        assert!(settle.take_due(start + Duration::from_secs(5)).is_none());
    }
}
