//! Implementation of the `simulate` command.
//!
//! Installs a [`SimulatedTimeSource`] and drives a headless [`Session`] in
//! fixed steps, so autoplay, the transition lock and the contact form's delays
//! can be watched (or diffed as JSON lines) without a terminal or real waiting.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::carousel::CarouselEvent;
use crate::config::{CarouselKind, Config};
use crate::constants::SIMULATION_STEP_MS;
use crate::logger::{Log, LoggerGuard};
use crate::showcase::{Session, SessionEvent};
use crate::signals::{SignalState, setup_signal_handler};
use crate::time_source::{self, SimulatedTimeSource, TimeSource};

/// One JSON line of `simulate --json` output.
#[derive(Debug, Serialize)]
struct Record<'a> {
    elapsed_ms: u128,
    #[serde(flatten)]
    event: &'a SessionEvent,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub elapsed: Duration,
    pub services_transitions: usize,
    pub testimonials_transitions: usize,
    /// Autoplay ticks that found a transition in flight.
    pub dropped_autoplay_ticks: usize,
    pub interrupted: bool,
}

impl SimulationSummary {
    fn record(&mut self, event: &SessionEvent) {
        if let SessionEvent::Carousel { carousel, event } = event {
            match event {
                CarouselEvent::TransitionFinished { .. } => match carousel {
                    CarouselKind::Services => self.services_transitions += 1,
                    CarouselKind::Testimonials => self.testimonials_transitions += 1,
                },
                CarouselEvent::AutoplayFired { accepted: false } => {
                    self.dropped_autoplay_ticks += 1
                }
                _ => {}
            }
        }
    }
}

/// Step `session` on `clock` until the simulation ends or shutdown is requested.
///
/// `sink` sees every event with the simulated time elapsed since the start.
pub fn run_simulation(
    session: &mut Session,
    clock: &dyn TimeSource,
    signal_state: &SignalState,
    mut sink: impl FnMut(Duration, &SessionEvent) -> Result<()>,
) -> Result<SimulationSummary> {
    let origin = clock.instant();
    let step = Duration::from_millis(SIMULATION_STEP_MS);
    let mut summary = SimulationSummary::default();

    loop {
        if signal_state.shutdown_requested() {
            summary.interrupted = true;
            break;
        }
        if clock.is_ended() {
            break;
        }

        clock.sleep(step);
        let elapsed = clock.instant().saturating_duration_since(origin);
        for event in session.tick() {
            summary.record(&event);
            sink(elapsed, &event)?;
        }
    }

    summary.elapsed = clock.instant().saturating_duration_since(origin);
    Ok(summary)
}

/// Handle `centinela simulate`.
pub fn handle_simulate_command(
    seconds: u64,
    multiplier: f64,
    log_file: Option<String>,
    json: bool,
    debug_enabled: bool,
) -> Result<()> {
    let length = Duration::from_secs(seconds);
    let source = Arc::new(SimulatedTimeSource::new(length, multiplier));
    let fast_forward = source.is_fast_forward();
    // Install before any logging so every line carries a simulated timestamp.
    time_source::init_time_source(source);
    let clock = time_source::current();

    let _log_guard: Option<LoggerGuard> = match log_file {
        Some(path) => Some(
            Log::start_file_logging(path.clone())
                .with_context(|| format!("Failed to open log file {path}"))?,
        ),
        None => None,
    };

    if json {
        // The JSON stream must stay parseable line by line.
        Log::set_enabled(false);
    }

    log_version!();
    log_block_start!("Simulation Mode");
    log_indented!("Simulated length: {seconds}s");
    if fast_forward {
        log_indented!("Time acceleration: fast-forward (instant execution)");
    } else {
        log_indented!(
            "Time acceleration: {multiplier}x (will complete in ~{:.1} seconds)",
            seconds as f64 / multiplier
        );
    }

    let config = Config::load()?;
    config.log_config();

    let signal_state = setup_signal_handler(debug_enabled)?;
    let mut session = Session::new(&config, Arc::clone(&clock), debug_enabled)?;

    log_block_start!("Running simulation...");
    let summary = run_simulation(
        &mut session,
        clock.as_ref(),
        &signal_state,
        |elapsed, event| {
            if json {
                let line = serde_json::to_string(&Record {
                    elapsed_ms: elapsed.as_millis(),
                    event,
                })?;
                crate::logger::write_output(&format!("{line}\n"));
            } else {
                log_decorated!("{event}");
            }
            Ok(())
        },
    )?;
    session.teardown();

    if summary.interrupted {
        log_block_start!(
            "Simulation interrupted after {:.1}s",
            summary.elapsed.as_secs_f64()
        );
    } else {
        log_block_start!("Simulation complete");
    }
    log_indented!("services: {} transitions", summary.services_transitions);
    log_indented!("testimonials: {} transitions", summary.testimonials_transitions);
    if summary.dropped_autoplay_ticks > 0 {
        log_indented!(
            "{} autoplay ticks dropped during transitions",
            summary.dropped_autoplay_ticks
        );
    }
    log_end!();

    Log::set_enabled(true);
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("simulate - Run both carousels on a simulated clock");
    log_block_start!("Usage: centinela simulate [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-s, --seconds <n>      Simulated length in seconds (1-86400, default 60)");
    log_indented!("-m, --multiplier <x>   Time acceleration (0.1-3600, 0 = fast-forward)");
    log_indented!("-f, --fast-forward     Same as --multiplier 0");
    log_indented!("-l, --log <file>       Write output to a file instead of stdout");
    log_indented!("    --json             Emit one JSON object per event");
    log_block_start!("Description:");
    log_indented!("Mounts the services and testimonials carousels with the configured");
    log_indented!("timings and lets autoplay run. Every transition start, commit and");
    log_indented!("autoplay tick is reported with its simulated timestamp.");
    log_block_start!("Examples:");
    log_indented!("# Two simulated minutes, instantly");
    log_indented!("centinela simulate --seconds 120 --fast-forward");
    log_pipe!();
    log_indented!("# Machine-readable event stream");
    log_indented!("centinela simulate -f --json > events.jsonl");
    log_end!();
}
