//! # Centinela Library
//!
//! Internal library for the `centinela` binary, a terminal rendition of a
//! security company's landing page: a services banner and a testimonials
//! rotator driven by carousel controllers, plus the contact form.
//!
//! This library exists to enable testing of the controllers and timers and to
//! keep CLI dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Entry Point**: [`Showcase`] runs the interactive session with resource management
//! - **Core Logic**: [`carousel`] holds the index/transition state machine and its timers
//! - **View**: [`view`] derives card and slide styles from controller state and
//!   renders terminal frames
//! - **Content**: [`content`] carries the services and testimonials shown
//! - **Contact**: [`contact`] validates and submits contact requests
//! - **Configuration**: [`config`] for TOML-based timings
//! - **Commands**: [`commands`] for CLI subcommands (simulate, contact, help)
//! - **Infrastructure**: signal handling, time sources, logging and utilities

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod carousel;
pub mod commands;
pub mod config;
pub mod constants;
pub mod contact;
pub mod content;
pub mod showcase;
pub mod signals;
pub mod time_source;
pub mod utils;
pub mod view;

pub use carousel::CarouselController;
pub use showcase::Showcase;
