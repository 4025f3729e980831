//! Pure presentation: controller state in, visual transforms out.
//!
//! Nothing here touches the terminal or a clock. The testimonials rotator
//! maps each visible card to a [`CardStyle`], the services banner maps each
//! slide to a [`SlideStyle`] using the in-flight transition progress, and both
//! carousels render a row of [`Indicator`] dots.
//!
//! [`terminal`] turns those values into text frames.

pub mod terminal;

use serde::Serialize;

use crate::carousel::{CarouselState, TransitionProgress, VisibleWindow};
use crate::constants::*;

/// Where a card sits in the 3-card layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRole {
    Center,
    LeftEdge,
    RightEdge,
}

/// 3D transform and sizing for one testimonial card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardStyle {
    pub role: CardRole,
    pub scale: f32,
    pub opacity: f32,
    pub blur_px: f32,
    pub translate_x: f32,
    pub translate_z: f32,
    pub rotate_y_deg: f32,
    pub max_width_px: u32,
    pub flex: f32,
    /// Arrow buttons are disabled while a transition holds the lock.
    pub controls_enabled: bool,
}

impl CardStyle {
    pub fn is_center(&self) -> bool {
        self.role == CardRole::Center
    }
}

/// Style for `index`, or `None` when the card is not in `window`.
pub fn card_style(
    index: usize,
    window: &VisibleWindow,
    is_transitioning: bool,
) -> Option<CardStyle> {
    let position = window.position_of(index)?;
    let center = window.center_position();
    let controls_enabled = !is_transitioning;

    if position == center {
        return Some(CardStyle {
            role: CardRole::Center,
            scale: CENTER_CARD_SCALE,
            opacity: 1.0,
            blur_px: 0.0,
            translate_x: 0.0,
            translate_z: CENTER_CARD_TRANSLATE_Z,
            rotate_y_deg: 0.0,
            max_width_px: CENTER_CARD_MAX_WIDTH_PX,
            flex: CENTER_CARD_FLEX,
            controls_enabled,
        });
    }

    // Cards left of center lean right, cards right of center lean left.
    let (role, direction) = if position < center {
        (CardRole::LeftEdge, 1.0)
    } else {
        (CardRole::RightEdge, -1.0)
    };

    Some(CardStyle {
        role,
        scale: EDGE_CARD_SCALE,
        opacity: EDGE_CARD_OPACITY,
        blur_px: EDGE_CARD_BLUR_PX,
        translate_x: direction * EDGE_CARD_TRANSLATE_X,
        translate_z: 0.0,
        rotate_y_deg: direction * EDGE_CARD_ROTATE_Y_DEG,
        max_width_px: EDGE_CARD_MAX_WIDTH_PX,
        flex: EDGE_CARD_FLEX,
        controls_enabled,
    })
}

/// Whether the prev/next arrows accept input.
pub fn controls_enabled(state: &CarouselState) -> bool {
    !state.is_transitioning
}

/// Opacity and zoom of one full-bleed slide in the services banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlideStyle {
    pub opacity: f32,
    pub scale: f32,
}

impl SlideStyle {
    pub const SHOWN: SlideStyle = SlideStyle {
        opacity: 1.0,
        scale: 1.0,
    };

    pub const HIDDEN: SlideStyle = SlideStyle {
        opacity: 0.0,
        scale: SLIDE_ENTRY_SCALE,
    };

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Cross-fade style for slide `index`.
///
/// While a transition runs, the outgoing slide fades out and zooms in with
/// expo-in easing and the incoming slide fades in and settles from the
/// entry zoom with expo-out easing.
pub fn slide_style(
    index: usize,
    state: &CarouselState,
    progress: Option<&TransitionProgress>,
) -> SlideStyle {
    let zoom = SLIDE_ENTRY_SCALE - 1.0;

    if let Some(progress) = progress {
        if index == progress.from {
            let eased = ease_expo_in(progress.fraction);
            return SlideStyle {
                opacity: 1.0 - eased,
                scale: 1.0 + zoom * eased,
            };
        }
        if index == progress.to {
            let eased = ease_expo_out(progress.fraction);
            return SlideStyle {
                opacity: eased,
                scale: SLIDE_ENTRY_SCALE - zoom * eased,
            };
        }
        return SlideStyle::HIDDEN;
    }

    if index == state.current_index {
        SlideStyle::SHOWN
    } else {
        SlideStyle::HIDDEN
    }
}

/// One navigation dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub index: usize,
    pub active: bool,
}

impl Indicator {
    /// Active dots are drawn wide.
    pub fn glyph(&self) -> &'static str {
        if self.active { "━━" } else { "•" }
    }
}

pub fn indicators(len: usize, current: usize) -> Vec<Indicator> {
    (0..len)
        .map(|index| Indicator {
            index,
            active: index == current,
        })
        .collect()
}

/// Exponential ease-in: flat start, steep finish.
pub fn ease_expo_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        0.0
    } else {
        2f32.powf(10.0 * (t - 1.0))
    }
}

/// Exponential ease-out: steep start, flat finish.
pub fn ease_expo_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 1.0 {
        1.0
    } else {
        1.0 - 2f32.powf(-10.0 * t)
    }
}
