//! # Carousel Engine
//!
//! An auto-rotating, crossfading slide carousel: a deterministic engine plus
//! the host, configuration and preview layers of the `carousel` binary.
//!
//! ## Architecture
//!
//! - **Engine**: `carousel` holds the sequencer, rotation scheduler, transition
//!   controller and lifecycle manager. It never reads a clock and never renders.
//! - **Rendering**: `render` turns engine snapshots into paint layers and ships
//!   a terminal preview and a JSON-lines renderer.
//! - **Host**: `host` runs every configured carousel of a screen, reconciles
//!   configuration reloads and fans out visibility.
//! - **Configuration**: `config` loads and validates `carousel.toml` with hot reload.
//! - **Commands**: `commands` implements `run`, `simulate`, `validate` and `help`.
//! - **Infrastructure**: logging, signals and a real or simulated time source.

// Logger first so its macros are visible to every module below.
#[macro_use]
pub mod logger;

pub mod args;
pub mod carousel;
pub mod commands;
pub mod config;
pub mod constants;
pub mod host;
pub mod render;
pub mod signals;
pub mod time_source;
pub mod utils;

pub use carousel::{BlendStyle, Carousel, CarouselError, Phase, Slide, SlideSet, Snapshot};
pub use host::{CarouselHost, SlideContent};
