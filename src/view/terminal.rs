//! Text rendering for the interactive showcase.
//!
//! [`Frame`] builds plain lines from the controllers (so it can be tested
//! without a tty); [`Frame::draw`] and [`TerminalGuard`] are the only parts
//! that talk to crossterm.

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use std::io::Write;

use super::{SlideStyle, card_style, controls_enabled, indicators, slide_style};
use crate::carousel::CarouselController;
use crate::contact::{FormMachine, FormState};
use crate::content::{SERVICES, TESTIMONIALS};
use crate::logger::Log;

const MIN_WIDTH: usize = 20;

/// Owns raw mode, the alternate screen and cursor visibility.
///
/// Console logging is muted while the guard lives unless output already goes
/// to a log file. Everything is restored on drop.
pub struct TerminalGuard {
    restore_logging: bool,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw terminal mode")?;
        if let Err(e) = execute!(std::io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter the alternate screen");
        }

        let restore_logging = Log::is_enabled() && !Log::is_file_logging();
        if restore_logging {
            Log::set_enabled(false);
        }

        Ok(Self { restore_logging })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        if self.restore_logging {
            Log::set_enabled(true);
        }
    }
}

/// Terminal width, falling back to 80 columns.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80)
}

/// One screenful of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    lines: Vec<String>,
}

impl Frame {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn push(&mut self, line: impl AsRef<str>) {
        self.lines.push(fit(line.as_ref(), self.width));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn heading(&mut self, title: &str, focused: bool) {
        let marker = if focused { "▶" } else { " " };
        self.push(format!("{marker} ── {title} "));
    }

    /// Services banner: the visible slides with their fade level, the
    /// autoplay progress bar and the dots.
    pub fn services(&mut self, carousel: &CarouselController, focused: bool) {
        self.heading("SERVICIOS DE SEGURIDAD", focused);

        let state = carousel.state();
        let progress = carousel.transition_progress();
        let window = carousel.visible_window();

        // During a cross-fade both ends of the transition are drawn.
        let mut candidates = window.indices().to_vec();
        if let Some(target) = state.pending_target
            && !candidates.contains(&target)
        {
            candidates.push(target);
        }
        let shown: Vec<(usize, SlideStyle)> = candidates
            .into_iter()
            .map(|index| (index, slide_style(index, &state, progress.as_ref())))
            .filter(|(_, style)| style.is_visible())
            .collect();

        for (index, style) in shown {
            let Some(service) = SERVICES.get(index) else {
                continue;
            };
            let shade = shade(style.opacity);
            self.push(format!("  {shade} {}", service.title));
            if style.opacity >= 0.5 {
                self.push(format!("    {}", service.description));
            }
        }

        let bar_width = self.width.saturating_sub(8).min(40);
        let bar = match carousel.autoplay_progress() {
            Some(fraction) => progress_bar(fraction, bar_width),
            None => format!("{} (paused)", progress_bar(0.0, bar_width)),
        };
        self.push(format!("  {bar}"));
        self.push(format!("  {}", dots(carousel)));
    }

    /// Testimonials rotator: one row per visible card, centre card expanded.
    pub fn testimonials(&mut self, carousel: &CarouselController, focused: bool) {
        self.heading("OPINIÓN DE NUESTROS CLIENTES", focused);

        let state = carousel.state();
        let window = carousel.visible_window();
        for &index in window.indices() {
            let (Some(style), Some(testimonial)) = (
                card_style(index, &window, state.is_transitioning),
                TESTIMONIALS.get(index),
            ) else {
                continue;
            };

            if style.is_center() {
                self.push(format!(
                    "  ┃ [{}] {}  {}",
                    testimonial.avatar,
                    testimonial.name,
                    testimonial.stars()
                ));
                self.push(format!("  ┃   \"{}\"", testimonial.text));
            } else {
                let lean = if style.translate_x > 0.0 { "╲" } else { "╱" };
                self.push(format!(
                    "  {lean} {} {}",
                    testimonial.avatar, testimonial.name
                ));
            }
        }

        let arrows = if controls_enabled(&state) {
            "◀  ▶"
        } else {
            "◁  ▷"
        };
        self.push(format!("  {arrows}  {}", dots(carousel)));
    }

    pub fn contact(&mut self, machine: &FormMachine) {
        self.heading("CONTACTO", false);
        let status = match machine.state() {
            FormState::Editing => "Press 'c' to send a demo request".to_string(),
            FormState::Submitting { .. } => "Enviando...".to_string(),
            FormState::Submitted { .. } => "¡Mensaje enviado! Te contactaremos pronto.".to_string(),
            FormState::Failed { reason, .. } => format!("Error al enviar: {reason}"),
        };
        self.push(format!("  {status}"));
    }

    pub fn footer(&mut self) {
        self.blank();
        self.push("  ←/→ navigate · Tab focus · 1-9 jump · p autoplay · c contact · q quit");
    }

    /// Paint the frame from the top-left corner.
    pub fn draw(&self, out: &mut impl Write) -> Result<()> {
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        for (row, line) in self.lines.iter().enumerate() {
            queue!(out, MoveTo(0, row as u16), Print(line))?;
        }
        out.flush()?;
        Ok(())
    }
}

fn dots(carousel: &CarouselController) -> String {
    indicators(carousel.len(), carousel.current_index())
        .iter()
        .map(|dot| dot.glyph())
        .collect::<Vec<_>>()
        .join(" ")
}

fn shade(opacity: f32) -> char {
    match opacity {
        o if o >= 0.9 => '█',
        o if o >= 0.6 => '▓',
        o if o >= 0.3 => '▒',
        _ => '░',
    }
}

/// Fixed-width bar filled to `fraction`.
pub fn progress_bar(fraction: f32, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::CarouselSettings;
    use crate::contact::{ContactSettings, SimulatedSubmitter};
    use crate::time_source::ManualClock;
    use std::sync::Arc;
    use std::time::Duration;

    fn carousel(clock: Arc<ManualClock>, len: usize, window_size: usize) -> CarouselController {
        CarouselController::new(
            "frame",
            len,
            CarouselSettings {
                transition: Duration::from_millis(800),
                window_size,
                autoplay_interval: None,
            },
            clock,
        )
        .unwrap()
    }

    #[test]
    fn test_fit_truncates_by_chars() {
        assert_eq!(fit("CONSULTORÍA", 20), "CONSULTORÍA");
        assert_eq!(fit("CONSULTORÍA", 6), "CONSU…");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(2.0, 3), "███");
        assert_eq!(progress_bar(0.0, 2), "░░");
    }

    #[test]
    fn test_services_frame_shows_current_slide() {
        let clock = ManualClock::new();
        let services = carousel(clock, 4, 2);
        let mut frame = Frame::new(200);
        frame.services(&services, true);

        let text = frame.lines().join("\n");
        assert!(text.contains("▶ ── SERVICIOS"));
        assert!(text.contains("█ CONTROL DE ACCESOS"));
        assert!(!text.contains("ACOMPAÑAMIENTO VIP"));
        assert!(text.contains("(paused)"));
    }

    #[test]
    fn test_services_frame_shows_both_slides_mid_fade() {
        let clock = ManualClock::new();
        let mut services = carousel(clock.clone(), 4, 2);
        services.advance();
        clock.advance_ms(400);

        let mut frame = Frame::new(200);
        frame.services(&services, false);
        let text = frame.lines().join("\n");
        assert!(text.contains("CONTROL DE ACCESOS"));
        assert!(text.contains("COBRO DE DEUDAS"));
    }

    #[test]
    fn test_testimonials_frame_expands_center() {
        let clock = ManualClock::new();
        let testimonials = carousel(clock, 6, 3);
        let mut frame = Frame::new(300);
        frame.testimonials(&testimonials, false);

        let lines = frame.lines();
        assert!(lines.iter().any(|l| l.contains("╲ AV Antonio Virgilioso")));
        assert!(lines.iter().any(|l| l.contains("[ER] Emilio Romo  ★★★★★")));
        assert!(lines.iter().any(|l| l.contains("╱ IG Iván González")));
        assert!(lines.iter().any(|l| l.contains("◀  ▶")));
    }

    #[test]
    fn test_contact_status_line() {
        let clock = ManualClock::new();
        let machine = FormMachine::new(
            ContactSettings::default(),
            clock,
            Box::new(SimulatedSubmitter),
        );
        let mut frame = Frame::new(80);
        frame.contact(&machine);
        assert!(frame.lines()[1].contains("Press 'c'"));
    }

    #[test]
    fn test_lines_never_exceed_width() {
        let clock = ManualClock::new();
        let testimonials = carousel(clock, 6, 3);
        let mut frame = Frame::new(30);
        frame.testimonials(&testimonials, true);
        frame.footer();
        assert!(frame.lines().iter().all(|line| line.chars().count() <= 30));
    }
}
