//! Error taxonomy for the carousel engine.
//!
//! None of these errors are retried. Configuration and data-shape problems
//! leave the engine in a safe static state; `StaleCallback` never leaves the
//! engine and is only visible to callers driving the transition controller
//! directly.

use std::fmt;
use std::time::Duration;

/// Errors reported by the carousel engine and its components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// The slide set has no slides; the engine shows nothing and schedules nothing.
    EmptySlideSet,
    /// The rotation interval is zero.
    InvalidInterval,
    /// The transition duration is zero.
    InvalidTransitionDuration,
    /// The transition is longer than the interval, so consecutive transitions would overlap.
    OverlappingTransition {
        interval: Duration,
        transition: Duration,
    },
    /// A progress or completion callback carried an epoch that is no longer current.
    StaleCallback,
    /// The engine was unmounted and cannot be mounted or updated again.
    TornDown,
}

impl CarouselError {
    /// Whether this error describes host configuration (as opposed to data or lifecycle).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CarouselError::InvalidInterval
                | CarouselError::InvalidTransitionDuration
                | CarouselError::OverlappingTransition { .. }
        )
    }
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarouselError::EmptySlideSet => write!(f, "slide set is empty"),
            CarouselError::InvalidInterval => write!(f, "rotation interval must be positive"),
            CarouselError::InvalidTransitionDuration => {
                write!(f, "transition duration must be positive")
            }
            CarouselError::OverlappingTransition {
                interval,
                transition,
            } => write!(
                f,
                "transition ({} ms) is longer than the rotation interval ({} ms)",
                transition.as_millis(),
                interval.as_millis()
            ),
            CarouselError::StaleCallback => write!(f, "callback belongs to a cancelled transition"),
            CarouselError::TornDown => write!(f, "carousel has been unmounted"),
        }
    }
}

impl std::error::Error for CarouselError {}

/// Check that an interval/transition pair can drive a rotating carousel.
pub fn validate_timing(interval: Duration, transition: Duration) -> Result<(), CarouselError> {
    if interval.is_zero() {
        return Err(CarouselError::InvalidInterval);
    }
    if transition.is_zero() {
        return Err(CarouselError::InvalidTransitionDuration);
    }
    if transition > interval {
        return Err(CarouselError::OverlappingTransition {
            interval,
            transition,
        });
    }
    Ok(())
}
