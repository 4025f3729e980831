//! Carousel controller: the index/transition state machine behind the
//! services banner and the testimonials rotator.
//!
//! A controller owns:
//! - the current index into a fixed set of `len` items,
//! - the transition lock (at most one index change in flight),
//! - two [`TimerSlot`]s: the one-shot transition timer and the recurring
//!   autoplay timer.
//!
//! It never renders anything. The view calls [`CarouselController::tick`]
//! once per frame, consumes the returned [`CarouselEvent`]s, reads
//! [`CarouselController::state`] / [`CarouselController::visible_window`]
//! and maps user input to [`go_to`](CarouselController::go_to),
//! [`advance`](CarouselController::advance) and
//! [`retreat`](CarouselController::retreat).
//!
//! ## State machine
//!
//! ```text
//!            go_to accepted
//!   Idle ───────────────────────► Transitioning
//!    ▲                                 │
//!    └──────── transition elapsed ─────┘
//! ```
//!
//! Navigation never fails: targets are normalized modulo `len`, and calls
//! that would start a second transition (or move to the current item) are
//! ignored and reported as [`Navigation::Ignored`].

pub mod timer;
pub mod window;


use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::time_source::TimeSource;
use timer::{Timer, TimerSlot};
pub use window::VisibleWindow;

/// Tunables for one carousel instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselSettings {
    /// How long the transition lock is held after an accepted navigation.
    pub transition: Duration,
    /// Number of items rendered at once.
    pub window_size: usize,
    /// Autoplay period applied by [`CarouselController::mount`], if any.
    pub autoplay_interval: Option<Duration>,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(500),
            window_size: 1,
            autoplay_interval: None,
        }
    }
}

/// The two controller phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Transitioning,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Transitioning => write!(f, "Transitioning"),
        }
    }
}

/// Read-only snapshot handed to the view each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselState {
    pub current_index: usize,
    pub is_transitioning: bool,
    /// Accepted target while a transition is in flight.
    pub pending_target: Option<usize>,
}

impl CarouselState {
    pub fn phase(&self) -> Phase {
        if self.is_transitioning {
            Phase::Transitioning
        } else {
            Phase::Idle
        }
    }
}

/// Why a navigation request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The normalized target is already the current item.
    AlreadyCurrent,
    /// Another transition holds the lock.
    Transitioning,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Accepted { from: usize, to: usize },
    Ignored(IgnoreReason),
}

impl Navigation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Navigation::Accepted { .. })
    }
}

/// State changes reported to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CarouselEvent {
    TransitionStarted { from: usize, to: usize },
    TransitionFinished { index: usize },
    AutoplayFired { accepted: bool },
    AutoplayStarted { interval_ms: u64 },
    AutoplayStopped,
}

impl fmt::Display for CarouselEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarouselEvent::TransitionStarted { from, to } => {
                write!(f, "transition {} → {}", from + 1, to + 1)
            }
            CarouselEvent::TransitionFinished { index } => write!(f, "showing #{}", index + 1),
            CarouselEvent::AutoplayFired { accepted: true } => write!(f, "autoplay advanced"),
            CarouselEvent::AutoplayFired { accepted: false } => {
                write!(f, "autoplay tick dropped (transition in flight)")
            }
            CarouselEvent::AutoplayStarted { interval_ms } => {
                write!(f, "autoplay every {interval_ms}ms")
            }
            CarouselEvent::AutoplayStopped => write!(f, "autoplay stopped"),
        }
    }
}

/// Progress of the in-flight transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionProgress {
    pub from: usize,
    pub to: usize,
    /// Elapsed fraction in `0.0..=1.0`.
    pub fraction: f32,
}

/// Index/transition state machine for one carousel.
pub struct CarouselController {
    name: String,
    len: usize,
    settings: CarouselSettings,
    clock: Arc<dyn TimeSource>,
    debug_enabled: bool,
    current: usize,
    pending: Option<usize>,
    transition_timer: TimerSlot,
    autoplay_timer: TimerSlot,
    events: Vec<CarouselEvent>,
}

impl fmt::Debug for CarouselController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselController")
            .field("name", &self.name)
            .field("len", &self.len)
            .field("settings", &self.settings)
            .field("current", &self.current)
            .field("pending", &self.pending)
            .field("autoplay", &self.autoplay_interval())
            .finish()
    }
}

impl CarouselController {
    /// Create a controller over `len` items, idle at index 0.
    ///
    /// Fails only for an empty item set or a zero window size.
    pub fn new(
        name: impl Into<String>,
        len: usize,
        settings: CarouselSettings,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        let name = name.into();
        anyhow::ensure!(len > 0, "carousel '{name}' needs at least one item");
        anyhow::ensure!(
            settings.window_size > 0,
            "carousel '{name}' needs a window size of at least 1"
        );

        Ok(Self {
            name,
            len,
            settings,
            clock,
            debug_enabled: false,
            current: 0,
            pending: None,
            transition_timer: TimerSlot::new(),
            autoplay_timer: TimerSlot::new(),
            events: Vec::new(),
        })
    }

    /// Log timer replacement and teardown details.
    pub fn with_debug(mut self, debug_enabled: bool) -> Self {
        self.debug_enabled = debug_enabled;
        self
    }

    /// Start autoplay if the settings ask for it. Called once by the view on mount.
    pub fn mount(&mut self) {
        if let Some(interval) = self.settings.autoplay_interval {
            self.start_autoplay(interval);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            current_index: self.current,
            is_transitioning: self.is_transitioning(),
            pending_target: self.pending,
        }
    }

    /// Items to render for the current index.
    pub fn visible_window(&self) -> VisibleWindow {
        VisibleWindow::compute(self.current, self.len, self.settings.window_size)
    }

    /// Wrap any integer onto `[0, len)`.
    pub fn normalize(&self, target: i64) -> usize {
        target.rem_euclid(self.len as i64) as usize
    }

    /// Request a move to `target` (any integer; normalized modulo `len`).
    pub fn go_to(&mut self, target: i64) -> Navigation {
        let to = self.normalize(target);
        if self.is_transitioning() {
            return Navigation::Ignored(IgnoreReason::Transitioning);
        }
        if to == self.current {
            return Navigation::Ignored(IgnoreReason::AlreadyCurrent);
        }

        let from = self.current;
        let now = self.clock.instant();
        self.events.push(CarouselEvent::TransitionStarted { from, to });

        if self.settings.transition.is_zero() {
            self.current = to;
            self.events.push(CarouselEvent::TransitionFinished { index: to });
        } else {
            self.pending = Some(to);
            self.transition_timer.arm(Timer::once(now, self.settings.transition));
        }
        self.restart_autoplay_period(now);

        Navigation::Accepted { from, to }
    }

    pub fn advance(&mut self) -> Navigation {
        self.go_to(self.current as i64 + 1)
    }

    pub fn retreat(&mut self) -> Navigation {
        self.go_to(self.current as i64 - 1)
    }

    /// Advance every `interval`, replacing any running autoplay.
    ///
    /// A zero interval disables autoplay.
    pub fn start_autoplay(&mut self, interval: Duration) {
        if interval.is_zero() {
            self.stop_autoplay();
            return;
        }

        let now = self.clock.instant();
        let replaced = self.autoplay_timer.arm(Timer::every(now, interval));
        if self.debug_enabled
            && let Some(previous) = replaced.and_then(|timer| timer.period())
        {
            log_debug!(
                "{}: autoplay {}ms replaced by {}ms",
                self.name,
                previous.as_millis(),
                interval.as_millis()
            );
        }

        self.events.push(CarouselEvent::AutoplayStarted {
            interval_ms: interval.as_millis() as u64,
        });
    }

    /// Cancel autoplay. Returns whether a timer was running.
    pub fn stop_autoplay(&mut self) -> bool {
        let cancelled = self.autoplay_timer.cancel();
        if cancelled {
            self.events.push(CarouselEvent::AutoplayStopped);
        }
        cancelled
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay_timer.is_armed()
    }

    pub fn autoplay_interval(&self) -> Option<Duration> {
        self.autoplay_timer.timer().and_then(|timer| timer.period())
    }

    /// Fraction of the current autoplay period that has elapsed.
    pub fn autoplay_progress(&self) -> Option<f32> {
        let now = self.clock.instant();
        self.autoplay_timer.timer().map(|timer| timer.progress(now))
    }

    pub fn transition_progress(&self) -> Option<TransitionProgress> {
        let to = self.pending?;
        let now = self.clock.instant();
        let fraction = self
            .transition_timer
            .timer()
            .map_or(1.0, |timer| timer.progress(now));
        Some(TransitionProgress {
            from: self.current,
            to,
            fraction,
        })
    }

    /// Run due timers and return everything that happened since the last call.
    ///
    /// A due transition completes before a due autoplay tick is handled.
    /// Every accepted navigation and every commit restarts the autoplay
    /// period, so autoplay never displaces an item that just arrived.
    pub fn tick(&mut self) -> Vec<CarouselEvent> {
        let now = self.clock.instant();

        if self.transition_timer.poll(now)
            && let Some(to) = self.pending.take()
        {
            self.current = to;
            self.events.push(CarouselEvent::TransitionFinished { index: to });
            self.restart_autoplay_period(now);
        }

        if self.autoplay_timer.poll(now) {
            let accepted = self.advance().is_accepted();
            self.events.push(CarouselEvent::AutoplayFired { accepted });
        }

        std::mem::take(&mut self.events)
    }

    /// Give the item that just started or finished moving a full autoplay
    /// period before the next automatic advance.
    fn restart_autoplay_period(&mut self, now: Instant) {
        if let Some(period) = self.autoplay_interval() {
            self.autoplay_timer.arm(Timer::every(now, period));
        }
    }

    /// Unmount: cancel the transition and autoplay timers.
    ///
    /// An in-flight transition is abandoned; the index stays where it was.
    pub fn teardown(mut self) {
        self.release_timers();
    }

    fn release_timers(&mut self) {
        let transition = self.transition_timer.cancel();
        let autoplay = self.autoplay_timer.cancel();
        self.pending = None;

        if self.debug_enabled && (transition || autoplay) {
            log_debug!(
                "{}: released timers (transition: {}, autoplay: {})",
                self.name,
                transition,
                autoplay
            );
        }
    }
}

impl Drop for CarouselController {
    fn drop(&mut self) {
        self.release_timers();
    }
}
