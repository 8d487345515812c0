//! Default configuration file generation.
//!
//! The generated file documents every setting with an aligned trailing comment
//! and ships one sample carousel per storefront component, so a fresh install
//! has something to rotate.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Write the default configuration to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

/// Contents of the generated `carousel.toml`.
pub fn default_config_content() -> String {
    let defaults = ConfigBuilder::new()
        .add_section("Defaults")
        .add_setting(
            "interval_ms",
            &DEFAULT_INTERVAL_MS.to_string(),
            &format!("Time between transition starts ({MINIMUM_INTERVAL_MS}-{MAXIMUM_INTERVAL_MS})"),
        )
        .add_setting(
            "transition_ms",
            &DEFAULT_TRANSITION_MS.to_string(),
            "Length of one blend; must not exceed interval_ms",
        )
        .add_setting(
            "blend",
            &format!("\"{DEFAULT_BLEND}\""),
            "Blend style: \"crossfade\" or \"slide\"",
        )
        .add_setting(
            "pause_when_hidden",
            &DEFAULT_PAUSE_WHEN_HIDDEN.to_string(),
            "Pause rotation while the screen is hidden",
        )
        .add_setting(
            "frame_interval_ms",
            &DEFAULT_FRAME_INTERVAL_MS.to_string(),
            &format!(
                "Preview render cadence ({MINIMUM_FRAME_INTERVAL_MS}-{MAXIMUM_FRAME_INTERVAL_MS})"
            ),
        )
        .add_setting(
            "watch",
            &DEFAULT_WATCH.to_string(),
            "Apply edits to this file without restarting",
        )
        .build();

    format!("{defaults}\n{SAMPLE_CAROUSELS}")
}

const SAMPLE_CAROUSELS: &str = r#"
#[Carousels]
# One [[carousel]] table per independently rotating component.
# interval_ms, transition_ms and blend may be overridden per carousel.

[[carousel]]
name = "hero-banner"
interval_ms = 6000
slides = [
    { id = "summer-sale", title = "Summer sale", cta = "Shop now" },
    { id = "new-arrivals", title = "New arrivals", image = "img/new-arrivals.jpg" },
    { id = "free-shipping", title = "Free shipping over $50" },
]

[[carousel]]
name = "hero-carousel"
blend = "slide"
slides = [
    { id = "look-1", title = "Look 1", image = "img/look-1.jpg" },
    { id = "look-2", title = "Look 2", image = "img/look-2.jpg" },
]

[[carousel]]
name = "promo-banner"
interval_ms = 3000
transition_ms = 500
slides = [
    { id = "code", title = "Use code WELCOME10", cta = "Copy code" },
    { id = "app", title = "Get the app", cta = "Download" },
]

[[carousel]]
name = "category-rail"
slides = [
    { id = "shoes", title = "Shoes" },
    { id = "bags", title = "Bags" },
    { id = "accessories", title = "Accessories" },
]

[[carousel]]
name = "image-carousel"
slides = [
    { id = "gallery-1", title = "Gallery", image = "img/gallery-1.jpg" },
]
"#;

/// Builds `key = value  # comment` lines with comments aligned in one column.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
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
        let column = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for (position, entry) in self.entries.into_iter().enumerate() {
            match entry {
                ConfigEntry::Section(title) => {
                    if position > 0 {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(column - line.len());
                    lines.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        lines.join("\n") + "\n"
    }
}
