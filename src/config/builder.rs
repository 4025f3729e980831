//! Default configuration file generation.
//!
//! The file is assembled with a small builder so every setting carries an
//! aligned trailing comment.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Write the commented default `centinela.toml` to `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

/// Text of the default configuration file.
pub fn default_config_content() -> String {
    ConfigBuilder::new()
        .add_section("Frame loop")
        .add_setting(
            "frame_interval_ms",
            &DEFAULT_FRAME_INTERVAL_MS.to_string(),
            &format!(
                "Redraw and tick cadence ({MINIMUM_FRAME_INTERVAL_MS}-{MAXIMUM_FRAME_INTERVAL_MS})ms"
            ),
        )
        .add_section("Services banner (cross-fade)")
        .add_table("services")
        .add_setting(
            "autoplay",
            &DEFAULT_SERVICES_AUTOPLAY.to_string(),
            "Rotate slides automatically",
        )
        .add_setting(
            "autoplay_interval_ms",
            &DEFAULT_SERVICES_AUTOPLAY_INTERVAL_MS.to_string(),
            &interval_comment("Time between slides"),
        )
        .add_setting(
            "transition_ms",
            &DEFAULT_SERVICES_TRANSITION_MS.to_string(),
            &transition_comment("Cross-fade duration"),
        )
        .add_setting(
            "window_size",
            &DEFAULT_SERVICES_WINDOW_SIZE.to_string(),
            &window_comment("Slides kept on screen"),
        )
        .add_section("Testimonials rotator (3 cards)")
        .add_table("testimonials")
        .add_setting(
            "autoplay",
            &DEFAULT_TESTIMONIALS_AUTOPLAY.to_string(),
            "Rotate cards automatically",
        )
        .add_setting(
            "autoplay_interval_ms",
            &DEFAULT_TESTIMONIALS_AUTOPLAY_INTERVAL_MS.to_string(),
            &interval_comment("Time between cards"),
        )
        .add_setting(
            "transition_ms",
            &DEFAULT_TESTIMONIALS_TRANSITION_MS.to_string(),
            &transition_comment("Navigation lock"),
        )
        .add_setting(
            "window_size",
            &DEFAULT_TESTIMONIALS_WINDOW_SIZE.to_string(),
            &window_comment("Cards kept on screen"),
        )
        .add_section("Contact form")
        .add_table("contact")
        .add_setting(
            "submit_delay_ms",
            &DEFAULT_SUBMIT_DELAY_MS.to_string(),
            &format!("Simulated network latency (0-{MAXIMUM_CONTACT_DELAY_MS})ms"),
        )
        .add_setting(
            "success_display_ms",
            &DEFAULT_SUCCESS_DISPLAY_MS.to_string(),
            &format!("How long the confirmation stays (0-{MAXIMUM_CONTACT_DELAY_MS})ms"),
        )
        .build()
}

fn interval_comment(what: &str) -> String {
    format!("{what} ({MINIMUM_AUTOPLAY_INTERVAL_MS}-{MAXIMUM_AUTOPLAY_INTERVAL_MS})ms")
}

fn transition_comment(what: &str) -> String {
    format!("{what} ({MINIMUM_TRANSITION_MS}-{MAXIMUM_TRANSITION_MS})ms | 0 = instant")
}

fn window_comment(what: &str) -> String {
    format!("{what} ({MINIMUM_WINDOW_SIZE}-{MAXIMUM_WINDOW_SIZE})")
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Table(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Comment heading, preceded by a blank line unless it opens the file.
    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_table(mut self, name: &str) -> Self {
        self.entries.push(ConfigEntry::Table(format!("[{name}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(heading) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(heading);
                }
                ConfigEntry::Table(header) => lines.push(header),
                ConfigEntry::Setting { line, comment } => {
                    lines.push(format!("{line:<width$}{comment}"));
                }
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_are_aligned() {
        let content = default_config_content();
        let columns: Vec<usize> = content
            .lines()
            .filter(|line| line.contains(" = "))
            .map(|line| line.find('#').unwrap())
            .collect();
        assert!(columns.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_default_content_declares_tables() {
        let content = default_config_content();
        for table in ["[services]", "[testimonials]", "[contact]"] {
            assert!(content.lines().any(|line| line == table), "{table}");
        }
    }
}
