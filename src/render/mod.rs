//! Rendering adapters for carousel snapshots.
//!
//! The engine only exposes `{current, next, phase, progress}`. This module
//! turns that into two paint slots so every concrete surface interprets one
//! normalized progress value the same way:
//!
//! - **background**: the slide the carousel lands on after this cycle (`next_index`)
//! - **foreground**: the slide currently shown (`current_index`), which blends away
//!
//! The background slot is always populated, so a blend never reveals a blank frame.

pub mod json;
pub mod terminal;

use anyhow::Result;
use serde::Serialize;

use crate::carousel::{BlendStyle, Phase, Slide, SlideSet, Snapshot};

pub use json::JsonRenderer;
pub use terminal::{TerminalGuard, TerminalRenderer};

/// Paint parameters for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layer {
    /// Index into the slide set.
    pub index: usize,
    /// 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
    /// Horizontal offset as a fraction of the viewport width; negative is left.
    pub offset: f32,
}

impl Layer {
    fn resting(index: usize) -> Self {
        Self {
            index,
            opacity: 1.0,
            offset: 0.0,
        }
    }
}

/// Background and foreground slots for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layers {
    pub background: Layer,
    pub foreground: Layer,
}

impl Layers {
    pub fn compute(snapshot: &Snapshot, blend: BlendStyle) -> Self {
        let progress = if snapshot.phase == Phase::Transitioning {
            snapshot.progress.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut background = Layer::resting(snapshot.next_index);
        let mut foreground = Layer::resting(snapshot.current_index);

        match blend {
            BlendStyle::Crossfade => {
                foreground.opacity = 1.0 - progress;
            }
            BlendStyle::Slide => {
                foreground.offset = -progress;
                background.offset = 1.0 - progress;
            }
        }

        Self {
            background,
            foreground,
        }
    }
}

/// Everything a renderer needs to paint one carousel.
#[derive(Debug)]
pub struct Frame<'a, P> {
    pub snapshot: Snapshot,
    pub blend: BlendStyle,
    pub layers: Layers,
    pub foreground: &'a Slide<P>,
    pub background: &'a Slide<P>,
}

impl<'a, P> Frame<'a, P> {
    /// Build a frame, or `None` when the engine has nothing to show.
    pub fn capture(snapshot: Snapshot, blend: BlendStyle, slides: &'a SlideSet<P>) -> Option<Self> {
        if matches!(
            snapshot.phase,
            Phase::Uninitialized | Phase::Empty | Phase::TornDown
        ) {
            return None;
        }
        let foreground = slides.get(snapshot.current_index)?;
        let background = slides.get(snapshot.next_index)?;

        Some(Self {
            snapshot,
            blend,
            layers: Layers::compute(&snapshot, blend),
            foreground,
            background,
        })
    }

    pub fn is_blending(&self) -> bool {
        self.snapshot.phase == Phase::Transitioning
    }
}

/// A concrete surface that paints carousels.
pub trait SlideRenderer<P> {
    /// Paint one carousel.
    fn render(&mut self, name: &str, frame: &Frame<'_, P>) -> Result<()>;

    /// Paint a carousel that has nothing to show.
    fn clear(&mut self, name: &str) -> Result<()>;

    /// Called once after every carousel of a frame has been painted.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(phase: Phase, progress: f32) -> Snapshot {
        Snapshot {
            current_index: 2,
            next_index: 0,
            phase,
            progress,
        }
    }

    #[test]
    fn test_crossfade_fades_foreground_over_background() {
        let layers = Layers::compute(&snapshot(Phase::Transitioning, 0.25), BlendStyle::Crossfade);

        assert_eq!(layers.foreground.index, 2);
        assert_eq!(layers.background.index, 0);
        assert_eq!(layers.foreground.opacity, 0.75);
        assert_eq!(layers.background.opacity, 1.0);
        assert_eq!(layers.foreground.offset, 0.0);
    }

    #[test]
    fn test_slide_translates_both_layers() {
        let layers = Layers::compute(&snapshot(Phase::Transitioning, 0.5), BlendStyle::Slide);

        assert_eq!(layers.foreground.offset, -0.5);
        assert_eq!(layers.background.offset, 0.5);
        assert_eq!(layers.foreground.opacity, 1.0);
    }

    #[test]
    fn test_resting_phases_ignore_progress() {
        for phase in [Phase::Holding, Phase::Static, Phase::Paused] {
            let layers = Layers::compute(&snapshot(phase, 0.9), BlendStyle::Crossfade);
            assert_eq!(layers.foreground.opacity, 1.0);
            assert_eq!(layers.foreground.offset, 0.0);
        }
    }

    #[test]
    fn test_capture_requires_displayable_phase() {
        let slides: SlideSet<()> = vec![Slide::new("a", ()), Slide::new("b", ())].into();
        let holding = Snapshot {
            current_index: 1,
            next_index: 0,
            phase: Phase::Holding,
            progress: 0.0,
        };

        let frame = Frame::capture(holding, BlendStyle::Slide, &slides).unwrap();
        assert_eq!(frame.foreground.id, "b");
        assert_eq!(frame.background.id, "a");
        assert!(!frame.is_blending());

        for phase in [Phase::Empty, Phase::TornDown, Phase::Uninitialized] {
            let hidden = Snapshot { phase, ..holding };
            assert!(Frame::capture(hidden, BlendStyle::Slide, &slides).is_none());
        }
    }
}
