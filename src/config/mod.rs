//! Configuration for the carousel host.
//!
//! Configuration lives in `carousel.toml`, located at
//! `$XDG_CONFIG_HOME/carousel/carousel.toml` unless a directory is given with
//! `--config`. A commented default file is generated the first time it is missing.
//!
//! ```toml
//! #[Defaults]
//! interval_ms = 4000        # Time between transition starts (100-600000)
//! transition_ms = 1000      # Length of one blend (1-600000)
//! blend = "crossfade"       # "crossfade" or "slide"
//! pause_when_hidden = true  # Pause rotation while the screen is hidden
//! frame_interval_ms = 33    # Preview render cadence (5-1000)
//! watch = true              # Apply edits to this file without restarting
//!
//! [[carousel]]
//! name = "hero"
//! interval_ms = 6000        # Per-carousel override
//! slides = [
//!     { id = "summer", title = "Summer sale", cta = "Shop now" },
//!     { id = "new-in", title = "New arrivals", image = "img/new.jpg" },
//! ]
//! ```
//!
//! Every `[[carousel]]` entry becomes one independent engine. Per-entry
//! `interval_ms`, `transition_ms` and `blend` fall back to the top-level values,
//! which fall back to the built-in defaults in [`crate::constants`].
//!
//! Loading validates ranges and uniqueness and rejects the file on the first
//! problem. A transition longer than its interval is deliberately accepted here:
//! the engine reports it and shows that carousel as a static slide.

pub mod builder;
pub mod loading;
pub mod validation;
pub mod watcher;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::carousel::BlendStyle;
use crate::constants::*;

pub use builder::{create_default_config, default_config_content};
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use validation::validate_config;
pub use watcher::{ConfigWatcher, start_config_watcher};

/// Top-level configuration file.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    pub interval_ms: Option<u64>,
    pub transition_ms: Option<u64>,
    pub blend: Option<BlendStyle>,
    pub pause_when_hidden: Option<bool>,
    pub frame_interval_ms: Option<u64>,
    pub watch: Option<bool>,
    #[serde(default, rename = "carousel")]
    pub carousels: Vec<CarouselEntry>,
}

/// One `[[carousel]]` table.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CarouselEntry {
    pub name: String,
    pub interval_ms: Option<u64>,
    pub transition_ms: Option<u64>,
    pub blend: Option<BlendStyle>,
    #[serde(default)]
    pub slides: Vec<SlideEntry>,
}

/// One slide of a carousel. `title` defaults to the id.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SlideEntry {
    pub id: String,
    pub title: Option<String>,
    pub image: Option<String>,
    pub cta: Option<String>,
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

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)
    }

    pub fn transition_ms(&self) -> u64 {
        self.transition_ms.unwrap_or(DEFAULT_TRANSITION_MS)
    }

    pub fn blend(&self) -> BlendStyle {
        self.blend.unwrap_or_default()
    }

    pub fn pause_when_hidden(&self) -> bool {
        self.pause_when_hidden.unwrap_or(DEFAULT_PAUSE_WHEN_HIDDEN)
    }

    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms.unwrap_or(DEFAULT_FRAME_INTERVAL_MS)
    }

    pub fn watch(&self) -> bool {
        self.watch.unwrap_or(DEFAULT_WATCH)
    }

    pub fn interval_for(&self, entry: &CarouselEntry) -> u64 {
        entry.interval_ms.unwrap_or_else(|| self.interval_ms())
    }

    pub fn transition_for(&self, entry: &CarouselEntry) -> u64 {
        entry.transition_ms.unwrap_or_else(|| self.transition_ms())
    }

    pub fn blend_for(&self, entry: &CarouselEntry) -> BlendStyle {
        entry.blend.unwrap_or_else(|| self.blend())
    }

    /// Print the effective configuration as a log block.
    pub fn log_config(&self) {
        let source = match get_custom_config_dir() {
            Some(dir) => format!("custom directory {}", crate::utils::private_path(&dir)),
            None => "default configuration".to_string(),
        };

        log_block_start!("Loaded {source}");
        log_indented!("Interval: {} ms", self.interval_ms());
        log_indented!("Transition: {} ms", self.transition_ms());
        log_indented!("Blend: {}", self.blend().as_str());
        log_indented!("Pause when hidden: {}", self.pause_when_hidden());
        log_indented!("Frame interval: {} ms", self.frame_interval_ms());
        log_indented!("Watch for changes: {}", self.watch());

        if self.carousels.is_empty() {
            log_indented!("No carousels configured");
            return;
        }

        log_block_start!("Carousels ({})", self.carousels.len());
        for entry in &self.carousels {
            log_indented!(
                "{}: {} slide(s), every {} ms, {} over {} ms",
                entry.name,
                entry.slides.len(),
                self.interval_for(entry),
                self.blend_for(entry).as_str(),
                self.transition_for(entry)
            );
        }
    }
}
