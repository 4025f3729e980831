//! Configuration validation.
//!
//! Out-of-range values are hard errors naming the field and the accepted
//! range. Pacing that works but behaves poorly only produces a warning.

use anyhow::Result;
use std::fmt::Display;
use std::ops::RangeInclusive;

use super::{CarouselKind, Config};
use crate::constants::*;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.frame_interval_ms {
        check_range(
            "frame_interval_ms",
            interval,
            MINIMUM_FRAME_INTERVAL_MS..=MAXIMUM_FRAME_INTERVAL_MS,
            "milliseconds",
        )?;
    }

    for kind in [CarouselKind::Services, CarouselKind::Testimonials] {
        validate_carousel(config, kind)?;
    }

    if let Some(delay) = config.contact.submit_delay_ms {
        check_range(
            "contact.submit_delay_ms",
            delay,
            0..=MAXIMUM_CONTACT_DELAY_MS,
            "milliseconds",
        )?;
    }
    if let Some(display) = config.contact.success_display_ms {
        check_range(
            "contact.success_display_ms",
            display,
            0..=MAXIMUM_CONTACT_DELAY_MS,
            "milliseconds",
        )?;
    }

    Ok(())
}

fn validate_carousel(config: &Config, kind: CarouselKind) -> Result<()> {
    let table = config.carousel(kind);
    let name = kind.as_str();

    if let Some(interval) = table.autoplay_interval_ms {
        check_range(
            &format!("{name}.autoplay_interval_ms"),
            interval,
            MINIMUM_AUTOPLAY_INTERVAL_MS..=MAXIMUM_AUTOPLAY_INTERVAL_MS,
            "milliseconds",
        )?;
    }
    if let Some(transition) = table.transition_ms {
        check_range(
            &format!("{name}.transition_ms"),
            transition,
            MINIMUM_TRANSITION_MS..=MAXIMUM_TRANSITION_MS,
            "milliseconds",
        )?;
    }
    if let Some(window) = table.window_size {
        check_range(
            &format!("{name}.window_size"),
            window,
            MINIMUM_WINDOW_SIZE..=MAXIMUM_WINDOW_SIZE,
            "items",
        )?;
    }

    // Autoplay this fast leaves an item no time on screen between transitions.
    if !is_pacing_sane(config, kind) {
        let settings = config.carousel_settings(kind);
        log_pipe!();
        log_warning!(
            "{name}: autoplay interval ({}ms) is not longer than the transition ({}ms)",
            settings.autoplay_interval.unwrap_or_default().as_millis(),
            settings.transition.as_millis()
        );
        log_indented!("Every other autoplay tick will be skipped while a transition runs.");
    }

    Ok(())
}

fn check_range<T>(field: &str, value: T, range: RangeInclusive<T>, unit: &str) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if !range.contains(&value) {
        anyhow::bail!(
            "{} ({}) must be between {} and {} {}",
            field,
            value,
            range.start(),
            range.end(),
            unit
        );
    }
    Ok(())
}

/// Whether the autoplay cadence leaves room for the transition to finish.
pub fn is_pacing_sane(config: &Config, kind: CarouselKind) -> bool {
    let settings = config.carousel_settings(kind);
    settings
        .autoplay_interval
        .is_none_or(|interval| interval > settings.transition)
}
