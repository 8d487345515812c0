//! Engine phases and the read-only view exposed to renderers.

use serde::Serialize;
use std::fmt;

/// Position of an engine in its lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Constructed, never mounted (or between unmount-for-restart and remount).
    Uninitialized,
    /// Mounted with no slides. Nothing is shown and nothing is scheduled.
    Empty,
    /// Single slide, or a configuration error. The current slide is shown without a timer.
    Static,
    /// Resting on the current slide, waiting for the next tick.
    Holding,
    /// Blending from the current slide to the next one.
    Transitioning,
    /// Rotation suspended while the carousel is not visible.
    Paused,
    /// Unmounted. Terminal.
    TornDown,
}

impl Phase {
    /// Phases in which exactly one timer is outstanding.
    pub fn is_rotating(&self) -> bool {
        matches!(self, Phase::Holding | Phase::Transitioning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Empty => "empty",
            Phase::Static => "static",
            Phase::Holding => "holding",
            Phase::Transitioning => "transitioning",
            Phase::Paused => "paused",
            Phase::TornDown => "torn down",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state owned by one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CarouselState {
    pub(crate) current_index: usize,
    pub(crate) next_index: usize,
    pub(crate) phase: Phase,
    pub(crate) progress: f32,
}

impl CarouselState {
    pub(crate) fn new() -> Self {
        Self {
            current_index: 0,
            next_index: 0,
            phase: Phase::Uninitialized,
            progress: 0.0,
        }
    }

    pub(crate) fn rest_at(&mut self, current_index: usize, next_index: usize, phase: Phase) {
        self.current_index = current_index;
        self.next_index = next_index;
        self.phase = phase;
        self.progress = 0.0;
    }
}

/// Pull-based view of the engine for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub current_index: usize,
    pub next_index: usize,
    pub phase: Phase,
    pub progress: f32,
}

impl From<&CarouselState> for Snapshot {
    fn from(state: &CarouselState) -> Self {
        Self {
            current_index: state.current_index,
            next_index: state.next_index,
            phase: state.phase,
            progress: if state.phase == Phase::Transitioning {
                state.progress
            } else {
                0.0
            },
        }
    }
}
