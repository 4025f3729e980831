//! Configuration for the showcase, the simulator and the contact form.
//!
//! Settings live in `centinela.toml`, searched in:
//! 1. the directory given with `--config <dir>` (set once per process);
//! 2. **XDG_CONFIG_HOME**/centinela/centinela.toml.
//!
//! A commented default file is written on the first plain run.
//!
//! ```toml
//! frame_interval_ms = 50        # Redraw and tick cadence (10-1000)
//!
//! #[Services banner]
//! [services]
//! autoplay = true               # Rotate slides automatically
//! autoplay_interval_ms = 6000   # Time between slides (500-600000)
//! transition_ms = 800           # Cross-fade duration (0-10000)
//! window_size = 2               # Slides kept on screen (1-9)
//!
//! [testimonials]
//! autoplay = true
//! autoplay_interval_ms = 5000
//! transition_ms = 500
//! window_size = 3
//!
//! [contact]
//! submit_delay_ms = 1500        # Simulated network latency (0-60000)
//! success_display_ms = 3000     # How long the confirmation stays (0-60000)
//! ```
//!
//! Every field is optional. Missing values fall back to the `DEFAULT_*`
//! constants, which match the landing page timings.

pub mod builder;
pub mod loading;
pub mod validation;

#[cfg(test)]
mod tests;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::carousel::CarouselSettings;
use crate::constants::*;
use crate::contact::ContactSettings;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Which of the two carousels a setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CarouselKind {
    Services,
    Testimonials,
}

impl CarouselKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarouselKind::Services => "services",
            CarouselKind::Testimonials => "testimonials",
        }
    }

    fn defaults(&self) -> (bool, u64, u64, usize) {
        match self {
            CarouselKind::Services => (
                DEFAULT_SERVICES_AUTOPLAY,
                DEFAULT_SERVICES_AUTOPLAY_INTERVAL_MS,
                DEFAULT_SERVICES_TRANSITION_MS,
                DEFAULT_SERVICES_WINDOW_SIZE,
            ),
            CarouselKind::Testimonials => (
                DEFAULT_TESTIMONIALS_AUTOPLAY,
                DEFAULT_TESTIMONIALS_AUTOPLAY_INTERVAL_MS,
                DEFAULT_TESTIMONIALS_TRANSITION_MS,
                DEFAULT_TESTIMONIALS_WINDOW_SIZE,
            ),
        }
    }
}

/// `[services]` / `[testimonials]` tables.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CarouselConfig {
    pub autoplay: Option<bool>,
    pub autoplay_interval_ms: Option<u64>,
    pub transition_ms: Option<u64>,
    pub window_size: Option<usize>,
}

/// `[contact]` table.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContactConfig {
    pub submit_delay_ms: Option<u64>,
    pub success_display_ms: Option<u64>,
}

/// Parsed `centinela.toml`.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub frame_interval_ms: Option<u64>,
    #[serde(default)]
    pub services: CarouselConfig,
    #[serde(default)]
    pub testimonials: CarouselConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn carousel(&self, kind: CarouselKind) -> &CarouselConfig {
        match kind {
            CarouselKind::Services => &self.services,
            CarouselKind::Testimonials => &self.testimonials,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.unwrap_or(DEFAULT_FRAME_INTERVAL_MS))
    }

    /// Controller settings with defaults applied.
    pub fn carousel_settings(&self, kind: CarouselKind) -> CarouselSettings {
        let table = self.carousel(kind);
        let (autoplay, interval_ms, transition_ms, window_size) = kind.defaults();

        let autoplay_interval = table
            .autoplay
            .unwrap_or(autoplay)
            .then(|| Duration::from_millis(table.autoplay_interval_ms.unwrap_or(interval_ms)));

        CarouselSettings {
            transition: Duration::from_millis(table.transition_ms.unwrap_or(transition_ms)),
            window_size: table.window_size.unwrap_or(window_size),
            autoplay_interval,
        }
    }

    pub fn contact_settings(&self) -> ContactSettings {
        ContactSettings {
            submit_delay: Duration::from_millis(
                self.contact.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS),
            ),
            success_display: Duration::from_millis(
                self.contact
                    .success_display_ms
                    .unwrap_or(DEFAULT_SUCCESS_DISPLAY_MS),
            ),
        }
    }

    pub fn log_config(&self) {
        let source = match get_custom_config_dir() {
            Some(dir) => format!("configuration from {}", crate::utils::private_path(&dir)),
            None => "default configuration".to_string(),
        };
        log_block_start!("Loaded {}", source);
        log_indented!("Frame interval: {}ms", self.frame_interval().as_millis());

        for kind in [CarouselKind::Services, CarouselKind::Testimonials] {
            let settings = self.carousel_settings(kind);
            let autoplay = match settings.autoplay_interval {
                Some(interval) => format!("every {}ms", interval.as_millis()),
                None => "off".to_string(),
            };
            log_indented!(
                "{}: autoplay {}, transition {}ms, window {}",
                kind.as_str(),
                autoplay,
                settings.transition.as_millis(),
                settings.window_size
            );
        }

        let contact = self.contact_settings();
        log_indented!(
            "contact: {}ms submit delay, {}ms confirmation",
            contact.submit_delay.as_millis(),
            contact.success_display.as_millis()
        );
    }
}
