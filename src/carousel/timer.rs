//! Owned timer handles for the carousel's cooperative scheduler.
//!
//! Nothing here spawns threads or registers callbacks. A [`Timer`] is just a
//! deadline (one-shot) or a cadence (recurring) measured against the
//! [`TimeSource`](crate::time_source::TimeSource) instants, and a
//! [`TimerSlot`] is the single place such a timer may live. The owner polls
//! the slot from its `tick`; arming replaces the previous timer, cancelling
//! or dropping the slot releases it. A slot can never hold two timers, so a
//! carousel cannot double-advance or leak an interval.

use std::time::{Duration, Instant};

/// Shape of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once, then disarms.
    Once,
    /// Fires every period on a fixed cadence.
    Every(Duration),
}

/// A single armed deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    kind: TimerKind,
    /// Start of the current span (arm time, or start of the current period).
    span_start: Instant,
    deadline: Instant,
}

impl Timer {
    pub fn once(now: Instant, after: Duration) -> Self {
        Self {
            kind: TimerKind::Once,
            span_start: now,
            deadline: now + after,
        }
    }

    /// Recurring timer; the first firing is one full `period` after `now`.
    ///
    /// A zero period is bumped to one millisecond so the cadence always moves forward.
    pub fn every(now: Instant, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            kind: TimerKind::Every(period),
            span_start: now,
            deadline: now + period,
        }
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn period(&self) -> Option<Duration> {
        match self.kind {
            TimerKind::Once => None,
            TimerKind::Every(period) => Some(period),
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Fraction of the current span that has elapsed, clamped to `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        let span = self.deadline.saturating_duration_since(self.span_start);
        if span.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.span_start);
        (elapsed.as_secs_f64() / span.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Move a recurring timer to its next deadline after `now`.
    ///
    /// Periods missed while nobody polled are coalesced: the timer fires once
    /// and stays aligned to its original cadence.
    fn reschedule(&mut self, now: Instant, period: Duration) {
        let behind = now.saturating_duration_since(self.deadline);
        let skipped = (behind.as_nanos() / period.as_nanos()).min(u32::MAX as u128 - 1) as u32;
        self.deadline += period * (skipped + 1);
        self.span_start = self.deadline - period;
    }
}

/// Holder for at most one [`Timer`].
#[derive(Debug, Default)]
pub struct TimerSlot {
    timer: Option<Timer>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `timer`, returning the timer it replaced (if any).
    pub fn arm(&mut self, timer: Timer) -> Option<Timer> {
        self.timer.replace(timer)
    }

    /// Disarm the slot. Returns whether a timer was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        self.timer.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<&Timer> {
        self.timer.as_ref()
    }

    /// Fire the timer if it is due at `now`.
    ///
    /// One-shot timers disarm themselves; recurring timers are rescheduled.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if !timer.is_due(now) {
            return false;
        }

        match timer.kind {
            TimerKind::Once => {
                self.timer = None;
            }
            TimerKind::Every(period) => timer.reschedule(now, period),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_once_fires_exactly_once() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(Timer::once(t0, ms(500)));

        assert!(!slot.poll(t0 + ms(499)));
        assert!(slot.poll(t0 + ms(500)));
        assert!(!slot.is_armed());
        assert!(!slot.poll(t0 + ms(5000)));
    }

    #[test]
    fn test_every_keeps_its_cadence() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(Timer::every(t0, ms(100)));

        // Polled late: still fires on the 100ms grid, not relative to the late poll.
        assert!(slot.poll(t0 + ms(130)));
        assert_eq!(slot.timer().unwrap().deadline(), t0 + ms(200));
        assert!(!slot.poll(t0 + ms(199)));
        assert!(slot.poll(t0 + ms(200)));
        assert!(slot.is_armed());
    }

    #[test]
    fn test_every_coalesces_missed_periods() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm(Timer::every(t0, ms(100)));

        assert!(slot.poll(t0 + ms(1050)));
        assert_eq!(slot.timer().unwrap().deadline(), t0 + ms(1100));
        assert!(!slot.poll(t0 + ms(1099)));
    }

    #[test]
    fn test_arm_replaces_previous_timer() {
        let t0 = Instant::now();
        let mut slot = TimerSlot::new();
        assert!(slot.arm(Timer::every(t0, ms(5000))).is_none());

        let replaced = slot.arm(Timer::every(t0, ms(6000)));
        assert_eq!(replaced.and_then(|t| t.period()), Some(ms(5000)));
        assert_eq!(slot.timer().unwrap().period(), Some(ms(6000)));
        assert!(!slot.poll(t0 + ms(5000)));
        assert!(slot.poll(t0 + ms(6000)));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut slot = TimerSlot::new();
        slot.arm(Timer::once(Instant::now(), ms(10)));
        assert!(slot.cancel());
        assert!(!slot.cancel());
        assert!(!slot.is_armed());
    }

    #[test]
    fn test_progress_is_clamped() {
        let t0 = Instant::now();
        let timer = Timer::once(t0, ms(800));
        assert_eq!(timer.progress(t0), 0.0);
        assert!((timer.progress(t0 + ms(400)) - 0.5).abs() < 1e-6);
        assert_eq!(timer.progress(t0 + ms(2000)), 1.0);
        assert_eq!(Timer::once(t0, Duration::ZERO).progress(t0), 1.0);
    }

    #[test]
    fn test_zero_period_is_bumped() {
        let t0 = Instant::now();
        let timer = Timer::every(t0, Duration::ZERO);
        assert_eq!(timer.period(), Some(ms(1)));
        assert_eq!(timer.remaining(t0), ms(1));
    }
}
