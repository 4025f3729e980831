//! Interactive terminal showcase: mounts both carousels and the contact form,
//! drives their timers and maps keys to navigation.
//!
//! The [`Showcase`] builder owns the resources (configuration, signal
//! handling, the terminal guard); the [`Session`] owns the controllers and is
//! shared with `centinela simulate`, which drives it headless.
//!
//! ```no_run
//! use centinela::Showcase;
//!
//! # fn main() -> anyhow::Result<()> {
//! Showcase::new(false).run()?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::carousel::{CarouselController, CarouselEvent, Navigation};
use crate::config::{CarouselKind, Config};
use crate::contact::{Field, FormEvent, FormMachine, SimulatedSubmitter, SubmitError};
use crate::content::{SERVICES, TESTIMONIALS};
use crate::signals::{SignalState, setup_signal_handler};
use crate::time_source::{self, TimeSource};
use crate::view::terminal::{Frame, TerminalGuard, terminal_width};

const DEMO_REQUEST: [(Field, &str); 4] = [
    (Field::Name, "Demo Centinela"),
    (Field::Phone, "+34 600 000 000"),
    (Field::Email, "demo@centinela.example"),
    (Field::Message, "Solicito información sobre control de accesos."),
];

/// Source of terminal events, so the loop can run without a tty.
pub trait InputSource {
    /// Wait up to `timeout` for the next event.
    fn next(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn next(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }
}

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Retreat,
    Advance,
    /// Zero-based target from the `1`-`9` keys.
    Jump(usize),
    ToggleAutoplay,
    SwitchFocus,
    SubmitDemo,
    Quit,
}

pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Left | KeyCode::Char('h') => Some(KeyAction::Retreat),
        KeyCode::Right | KeyCode::Char('l') => Some(KeyAction::Advance),
        KeyCode::Tab | KeyCode::BackTab => Some(KeyAction::SwitchFocus),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(KeyAction::ToggleAutoplay),
        KeyCode::Char('c') => Some(KeyAction::SubmitDemo),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char(digit @ '1'..='9') => Some(KeyAction::Jump(digit as usize - '1' as usize)),
        _ => None,
    }
}

/// Something that happened during one [`Session::tick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SessionEvent {
    Carousel {
        carousel: CarouselKind,
        #[serde(flatten)]
        event: CarouselEvent,
    },
    Contact {
        #[serde(flatten)]
        event: FormEvent,
    },
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEvent::Carousel { carousel, event } => {
                write!(f, "{}: {}", carousel.as_str(), event)
            }
            SessionEvent::Contact { event } => match event {
                FormEvent::SubmissionStarted { email } => {
                    write!(f, "contact: submitting request from {email}")
                }
                FormEvent::Delivered => write!(f, "contact: request delivered"),
                FormEvent::Failed { reason } => write!(f, "contact: delivery failed ({reason})"),
                FormEvent::Reset => write!(f, "contact: form ready"),
            },
        }
    }
}

/// Both carousels and the contact form, mounted and ticking.
pub struct Session {
    services: CarouselController,
    testimonials: CarouselController,
    form: FormMachine,
    focus: CarouselKind,
    config: Config,
    pending: Vec<SessionEvent>,
}

impl Session {
    /// Build and mount everything; autoplay starts where configured.
    pub fn new(config: &Config, clock: Arc<dyn TimeSource>, debug_enabled: bool) -> Result<Self> {
        let mut services = CarouselController::new(
            CarouselKind::Services.as_str(),
            SERVICES.len(),
            config.carousel_settings(CarouselKind::Services),
            clock.clone(),
        )?
        .with_debug(debug_enabled);
        let mut testimonials = CarouselController::new(
            CarouselKind::Testimonials.as_str(),
            TESTIMONIALS.len(),
            config.carousel_settings(CarouselKind::Testimonials),
            clock.clone(),
        )?
        .with_debug(debug_enabled);

        services.mount();
        testimonials.mount();

        Ok(Self {
            services,
            testimonials,
            form: FormMachine::new(config.contact_settings(), clock, Box::new(SimulatedSubmitter)),
            focus: CarouselKind::Testimonials,
            config: config.clone(),
            pending: Vec::new(),
        })
    }

    pub fn carousel(&self, kind: CarouselKind) -> &CarouselController {
        match kind {
            CarouselKind::Services => &self.services,
            CarouselKind::Testimonials => &self.testimonials,
        }
    }

    pub fn carousel_mut(&mut self, kind: CarouselKind) -> &mut CarouselController {
        match kind {
            CarouselKind::Services => &mut self.services,
            CarouselKind::Testimonials => &mut self.testimonials,
        }
    }

    pub fn form(&self) -> &FormMachine {
        &self.form
    }

    pub fn focus(&self) -> CarouselKind {
        self.focus
    }

    /// Apply one key action. Returns false when the session should end.
    pub fn handle(&mut self, action: KeyAction) -> bool {
        let focus = self.focus;
        match action {
            KeyAction::Quit => return false,
            KeyAction::SwitchFocus => {
                self.focus = match focus {
                    CarouselKind::Services => CarouselKind::Testimonials,
                    CarouselKind::Testimonials => CarouselKind::Services,
                };
            }
            KeyAction::Retreat => {
                self.navigate(focus, |carousel| carousel.retreat());
            }
            KeyAction::Advance => {
                self.navigate(focus, |carousel| carousel.advance());
            }
            KeyAction::Jump(target) => {
                if target < self.carousel(focus).len() {
                    self.navigate(focus, |carousel| carousel.go_to(target as i64));
                }
            }
            KeyAction::ToggleAutoplay => self.toggle_autoplay(focus),
            KeyAction::SubmitDemo => {
                if let Err(e) = self.submit_demo() {
                    log_debug!("Demo submission refused: {e}");
                }
            }
        }
        true
    }

    fn navigate(
        &mut self,
        kind: CarouselKind,
        op: impl FnOnce(&mut CarouselController) -> Navigation,
    ) {
        if let Navigation::Ignored(reason) = op(self.carousel_mut(kind)) {
            log_debug!("{}: navigation ignored ({:?})", kind.as_str(), reason);
        }
    }

    /// Pause autoplay on `kind`, or resume it with the configured period.
    pub fn toggle_autoplay(&mut self, kind: CarouselKind) {
        let configured = self.config.carousel_settings(kind).autoplay_interval;
        let carousel = self.carousel_mut(kind);
        if carousel.is_autoplaying() {
            carousel.stop_autoplay();
        } else {
            let fallback = match kind {
                CarouselKind::Services => crate::constants::DEFAULT_SERVICES_AUTOPLAY_INTERVAL_MS,
                CarouselKind::Testimonials => {
                    crate::constants::DEFAULT_TESTIMONIALS_AUTOPLAY_INTERVAL_MS
                }
            };
            carousel.start_autoplay(configured.unwrap_or(Duration::from_millis(fallback)));
        }
    }

    /// Fill the form with demo values and submit it.
    pub fn submit_demo(&mut self) -> Result<(), SubmitError> {
        if self.form.state().is_submitting() {
            return Err(SubmitError::Busy);
        }
        for (field, value) in DEMO_REQUEST {
            self.form.set(field, value);
        }
        let event = self.form.submit()?;
        self.pending.push(SessionEvent::Contact { event });
        Ok(())
    }

    /// Run every due timer and collect what happened.
    pub fn tick(&mut self) -> Vec<SessionEvent> {
        let mut events = std::mem::take(&mut self.pending);

        for kind in [CarouselKind::Services, CarouselKind::Testimonials] {
            events.extend(
                self.carousel_mut(kind)
                    .tick()
                    .into_iter()
                    .map(|event| SessionEvent::Carousel {
                        carousel: kind,
                        event,
                    }),
            );
        }

        if let Some(event) = self.form.tick() {
            events.push(SessionEvent::Contact { event });
        }
        events
    }

    pub fn render(&self, width: usize) -> Frame {
        let mut frame = Frame::new(width);
        frame.services(&self.services, self.focus == CarouselKind::Services);
        frame.blank();
        frame.testimonials(&self.testimonials, self.focus == CarouselKind::Testimonials);
        frame.blank();
        frame.contact(&self.form);
        frame.footer();
        frame
    }

    /// Unmount both carousels, cancelling their timers.
    pub fn teardown(self) {
        self.services.teardown();
        self.testimonials.teardown();
    }
}

/// Builder for the interactive showcase.
pub struct Showcase {
    debug_enabled: bool,
    show_headers: bool,
}

impl Showcase {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
        }
    }

    /// Skip the version header.
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
            if self.debug_enabled {
                log_pipe!();
                log_debug!("Debug mode enabled - logging timer replacement and teardown");
            }
        }

        let config = Config::load()?;
        config.log_config();

        let signal_state = setup_signal_handler(self.debug_enabled)?;
        let session = Session::new(&config, time_source::current(), self.debug_enabled)?;

        let result = {
            let _guard = TerminalGuard::new()?;
            run_loop(session, &mut CrosstermInput, &signal_state, &config, self.debug_enabled)
        };

        log_block_start!("Showcase closed, timers released");
        log_end!();
        result
    }
}

/// Frame loop: input, timers, render, until quit or a shutdown signal.
///
/// The session is torn down on every exit path.
pub fn run_loop(
    mut session: Session,
    input: &mut impl InputSource,
    signal_state: &SignalState,
    config: &Config,
    debug_enabled: bool,
) -> Result<()> {
    let frame_interval = config.frame_interval();
    let mut stdout = std::io::stdout();

    let result = loop {
        if signal_state.shutdown_requested() {
            break Ok(());
        }

        match input.next(frame_interval) {
            Ok(Some(Event::Key(key))) => {
                if let Some(action) = map_key(&key)
                    && !session.handle(action)
                {
                    break Ok(());
                }
            }
            Ok(_) => {}
            Err(e) => break Err(e),
        }

        for event in session.tick() {
            if debug_enabled {
                log_debug!("{event}");
            }
        }

        if let Err(e) = session.render(terminal_width()).draw(&mut stdout) {
            break Err(e);
        }
    };

    session.teardown();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_source::ManualClock;
    use std::collections::VecDeque;

    fn session(clock: Arc<ManualClock>) -> Session {
        Session::new(&Config::default(), clock, false).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    struct Scripted(VecDeque<Event>);

    impl InputSource for Scripted {
        fn next(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.0.pop_front())
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(&press(KeyCode::Left)), Some(KeyAction::Retreat));
        assert_eq!(map_key(&press(KeyCode::Right)), Some(KeyAction::Advance));
        assert_eq!(map_key(&press(KeyCode::Char('3'))), Some(KeyAction::Jump(2)));
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('c'))), Some(KeyAction::SubmitDemo));
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(map_key(&press(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_mount_starts_configured_autoplay() {
        let clock = ManualClock::new();
        let session = session(clock);
        assert_eq!(
            session.carousel(CarouselKind::Services).autoplay_interval(),
            Some(Duration::from_millis(6000))
        );
        assert_eq!(
            session.carousel(CarouselKind::Testimonials).autoplay_interval(),
            Some(Duration::from_millis(5000))
        );
    }

    #[test]
    fn test_keys_drive_the_focused_carousel() {
        let clock = ManualClock::new();
        let mut session = session(clock.clone());
        assert_eq!(session.focus(), CarouselKind::Testimonials);

        assert!(session.handle(KeyAction::Retreat));
        clock.advance_ms(500);
        session.tick();
        assert_eq!(session.carousel(CarouselKind::Testimonials).current_index(), 5);
        assert_eq!(session.carousel(CarouselKind::Services).current_index(), 0);

        session.handle(KeyAction::SwitchFocus);
        session.handle(KeyAction::Jump(2));
        clock.advance_ms(800);
        session.tick();
        assert_eq!(session.carousel(CarouselKind::Services).current_index(), 2);

        // Out of range for four slides.
        session.handle(KeyAction::Jump(7));
        assert!(!session.carousel(CarouselKind::Services).is_transitioning());

        assert!(!session.handle(KeyAction::Quit));
    }

    #[test]
    fn test_toggle_autoplay() {
        let clock = ManualClock::new();
        let mut session = session(clock);
        session.toggle_autoplay(CarouselKind::Services);
        assert!(!session.carousel(CarouselKind::Services).is_autoplaying());
        session.toggle_autoplay(CarouselKind::Services);
        assert_eq!(
            session.carousel(CarouselKind::Services).autoplay_interval(),
            Some(Duration::from_millis(6000))
        );
    }

    #[test]
    fn test_demo_submission_cycle() {
        let clock = ManualClock::new();
        let mut session = session(clock.clone());

        session.submit_demo().unwrap();
        assert_eq!(session.submit_demo(), Err(SubmitError::Busy));

        let started = session.tick();
        assert!(started.iter().any(|event| matches!(
            event,
            SessionEvent::Contact {
                event: FormEvent::SubmissionStarted { .. }
            }
        )));

        clock.advance_ms(1500);
        let delivered = session.tick();
        assert!(delivered.contains(&SessionEvent::Contact {
            event: FormEvent::Delivered
        }));
    }

    #[test]
    fn test_session_event_json() {
        let event = SessionEvent::Carousel {
            carousel: CarouselKind::Services,
            event: CarouselEvent::TransitionFinished { index: 1 },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["source"], "carousel");
        assert_eq!(json["carousel"], "services");
        assert_eq!(json["event"], "transition_finished");
        assert_eq!(json["index"], 1);
    }

    #[test]
    fn test_render_marks_focus() {
        let clock = ManualClock::new();
        let session = session(clock);
        let frame = session.render(120);
        let lines = frame.lines();
        assert!(lines.iter().any(|line| line.starts_with("  ── SERVICIOS")));
        assert!(lines.iter().any(|line| line.starts_with("▶ ── OPINIÓN")));
    }

    #[test]
    fn test_run_loop_stops_on_shutdown_signal() {
        let clock = ManualClock::new();
        let session = session(clock);
        let signals = SignalState::detached();
        signals.request_shutdown();

        let mut input = Scripted(VecDeque::new());
        let result = run_loop(session, &mut input, &signals, &Config::default(), false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_loop_quits_on_key() {
        let clock = ManualClock::new();
        let session = session(clock);
        let signals = SignalState::detached();

        let mut input = Scripted(VecDeque::from([Event::Key(press(KeyCode::Char('q')))]));
        let result = run_loop(session, &mut input, &signals, &Config::default(), false);
        assert!(result.is_ok());
    }
}
