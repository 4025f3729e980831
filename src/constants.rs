//! Application-wide defaults and validation limits.
//!
//! Configuration fields that are left out of `centinela.toml` fall back to the
//! `DEFAULT_*` values here; the `MINIMUM_*` / `MAXIMUM_*` pairs are enforced by
//! `config::validation`.

// # Frame loop
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 50;
pub const MINIMUM_FRAME_INTERVAL_MS: u64 = 10;
pub const MAXIMUM_FRAME_INTERVAL_MS: u64 = 1000;

// # Carousel limits (shared by both carousels)
pub const MINIMUM_AUTOPLAY_INTERVAL_MS: u64 = 500;
pub const MAXIMUM_AUTOPLAY_INTERVAL_MS: u64 = 600_000;
pub const MINIMUM_TRANSITION_MS: u64 = 0;
pub const MAXIMUM_TRANSITION_MS: u64 = 10_000;
pub const MINIMUM_WINDOW_SIZE: usize = 1;
pub const MAXIMUM_WINDOW_SIZE: usize = 9;

// # Services banner (cross-fade)
pub const DEFAULT_SERVICES_AUTOPLAY: bool = true;
pub const DEFAULT_SERVICES_AUTOPLAY_INTERVAL_MS: u64 = 6000;
pub const DEFAULT_SERVICES_TRANSITION_MS: u64 = 800;
pub const DEFAULT_SERVICES_WINDOW_SIZE: usize = 2;

// # Testimonials rotator (3-card)
pub const DEFAULT_TESTIMONIALS_AUTOPLAY: bool = true;
pub const DEFAULT_TESTIMONIALS_AUTOPLAY_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_TESTIMONIALS_TRANSITION_MS: u64 = 500;
pub const DEFAULT_TESTIMONIALS_WINDOW_SIZE: usize = 3;

// # Contact form
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1500;
pub const DEFAULT_SUCCESS_DISPLAY_MS: u64 = 3000;
pub const MAXIMUM_CONTACT_DELAY_MS: u64 = 60_000;

// # Card geometry (testimonials)
pub const CENTER_CARD_SCALE: f32 = 1.1;
pub const EDGE_CARD_SCALE: f32 = 0.9;
pub const EDGE_CARD_OPACITY: f32 = 0.6;
pub const EDGE_CARD_BLUR_PX: f32 = 2.0;
pub const CENTER_CARD_TRANSLATE_Z: f32 = 50.0;
pub const EDGE_CARD_TRANSLATE_X: f32 = 20.0;
pub const EDGE_CARD_ROTATE_Y_DEG: f32 = 15.0;
pub const CENTER_CARD_MAX_WIDTH_PX: u32 = 450;
pub const EDGE_CARD_MAX_WIDTH_PX: u32 = 350;
pub const CENTER_CARD_FLEX: f32 = 1.2;
pub const EDGE_CARD_FLEX: f32 = 1.0;

// # Slide cross-fade (services)
pub const SLIDE_ENTRY_SCALE: f32 = 1.1;

// # Simulation
pub const DEFAULT_SIMULATION_SECONDS: u64 = 60;
pub const DEFAULT_SIMULATION_MULTIPLIER: f64 = 0.0;
pub const SIMULATION_STEP_MS: u64 = 50;

// # Exit codes
pub const EXIT_FAILURE: i32 = 1;
