//! Time source abstraction for real, simulated and manually driven clocks.
//!
//! Everything in centinela that waits (carousel transitions, autoplay
//! periods, the contact form's artificial latency) reads time through a
//! [`TimeSource`]. The showcase uses [`RealTimeSource`], `centinela simulate`
//! installs a [`SimulatedTimeSource`], and tests drive a `ManualClock`
//! (available with the `testing-support` feature) one step at a time.
//!
//! Timers compare monotonic [`Instant`]s; wall-clock [`DateTime`]s are only
//! used for log prefixes and for stamping contact requests.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Global time source instance, defaults to [`RealTimeSource`].
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations.
pub trait TimeSource: Send + Sync {
    /// Monotonic reading used for every deadline computation.
    fn instant(&self) -> Instant;

    /// Wall-clock time matching [`TimeSource::instant`].
    fn now(&self) -> DateTime<Local>;

    /// Block (or pretend to block) for `duration`.
    fn sleep(&self, duration: Duration);

    fn is_simulated(&self) -> bool;

    /// Whether a bounded simulation has run out of time.
    fn is_ended(&self) -> bool {
        false
    }
}

/// System clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Accelerated clock used by `centinela simulate`.
///
/// Two modes:
/// - linear acceleration: every `sleep(d)` really sleeps `d / multiplier`;
/// - fast-forward (`multiplier == 0.0`): sleeps return immediately and the
///   simulated time jumps by `d`.
///
/// Simulated time never runs past `origin + length`.
pub struct SimulatedTimeSource {
    origin: Instant,
    start_time: DateTime<Local>,
    length: Duration,
    multiplier: f64,
    elapsed: Mutex<Duration>,
}

impl SimulatedTimeSource {
    pub fn new(length: Duration, multiplier: f64) -> Self {
        Self {
            origin: Instant::now(),
            start_time: Local::now(),
            length,
            multiplier: if multiplier < 0.0 { 0.0 } else { multiplier },
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    /// Simulated time elapsed since the simulation started.
    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_fast_forward(&self) -> bool {
        self.multiplier == 0.0
    }
}

impl TimeSource for SimulatedTimeSource {
    fn instant(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn now(&self) -> DateTime<Local> {
        let elapsed = ChronoDuration::from_std(self.elapsed()).unwrap_or(ChronoDuration::zero());
        self.start_time + elapsed
    }

    fn sleep(&self, duration: Duration) {
        let step = {
            let elapsed = self.elapsed();
            duration.min(self.length.saturating_sub(elapsed))
        };
        if step.is_zero() {
            return;
        }

        if !self.is_fast_forward() {
            std::thread::sleep(step.div_f64(self.multiplier));
        }

        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.elapsed() >= self.length
    }
}

/// Hand-driven clock for tests: time only moves through [`ManualClock::advance`]
/// or [`TimeSource::sleep`].
#[cfg(any(test, feature = "testing-support"))]
pub struct ManualClock {
    origin: Instant,
    start_time: DateTime<Local>,
    offset: Mutex<Duration>,
}

#[cfg(any(test, feature = "testing-support"))]
impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: Instant::now(),
            start_time: Local::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner()) += by;
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl TimeSource for ManualClock {
    fn instant(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn now(&self) -> DateTime<Local> {
        self.start_time + ChronoDuration::from_std(self.elapsed()).unwrap_or(ChronoDuration::zero())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Install the process-wide time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Shared handle to the process-wide time source.
pub fn current() -> Arc<dyn TimeSource> {
    Arc::clone(TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)))
}

pub fn now() -> DateTime<Local> {
    current().now()
}

pub fn instant() -> Instant {
    current().instant()
}

pub fn sleep(duration: Duration) {
    current().sleep(duration)
}

pub fn is_simulated() -> bool {
    current().is_simulated()
}

/// Whether the installed simulation has reached its end (always false for real time).
pub fn simulation_ended() -> bool {
    current().is_ended()
}
