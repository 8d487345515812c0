//! Transition controller: drives a single normalized blend value per engine.
//!
//! Every transition gets a fresh epoch and only the active epoch is accepted.
//! An id captured before a cancel or a superseding `begin` never matches again,
//! so its late progress or completion callbacks are rejected with
//! [`CarouselError::StaleCallback`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::CarouselError;

/// How the renderer should interpret blend progress. Fixed per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendStyle {
    /// Outgoing slide fades out over the incoming one.
    #[default]
    Crossfade,
    /// Outgoing slide translates out while the incoming one translates in.
    Slide,
}

impl BlendStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendStyle::Crossfade => "crossfade",
            BlendStyle::Slide => "slide",
        }
    }
}

/// Who advances blend progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDriver {
    /// Progress is derived from the time passed to the engine.
    #[default]
    Clock,
    /// An external animation primitive reports progress and completion.
    Host,
}

/// Epoch tag of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransitionId(u64);

impl TransitionId {
    pub fn epoch(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct ActiveTransition {
    id: TransitionId,
    started_at: Duration,
    duration: Duration,
    progress: f32,
}

#[derive(Debug, Default)]
pub struct TransitionController {
    epoch: u64,
    active: Option<ActiveTransition>,
}

impl TransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition. A transition that was still running is cancelled
    /// without completing and its id is returned alongside the new one.
    pub fn begin(
        &mut self,
        duration: Duration,
        now: Duration,
    ) -> (TransitionId, Option<TransitionId>) {
        let cancelled = self.active.take().map(|stale| stale.id);
        self.epoch += 1;
        let id = TransitionId(self.epoch);
        self.active = Some(ActiveTransition {
            id,
            started_at: now,
            duration,
            progress: 0.0,
        });
        (id, cancelled)
    }

    /// Record progress reported for `id`. Values are clamped to `[0, 1]` and
    /// never move backwards. Returns the progress now in effect.
    pub fn on_progress(&mut self, id: TransitionId, progress: f32) -> Result<f32, CarouselError> {
        let active = self.current_mut(id)?;
        let progress = if progress.is_nan() {
            active.progress
        } else {
            progress.clamp(0.0, 1.0)
        };
        if progress > active.progress {
            active.progress = progress;
        }
        Ok(active.progress)
    }

    /// Finish the transition identified by `id`.
    pub fn complete(&mut self, id: TransitionId) -> Result<(), CarouselError> {
        self.current_mut(id)?;
        self.active = None;
        Ok(())
    }

    /// Invalidate the current epoch. Returns the id that was running, if any.
    pub fn cancel(&mut self) -> Option<TransitionId> {
        self.active.take().map(|stale| stale.id)
    }

    /// Update progress from elapsed time and return it with the active id.
    pub fn sample(&mut self, now: Duration) -> Option<(TransitionId, f32)> {
        let active = self.active.as_mut()?;
        let elapsed = now.saturating_sub(active.started_at);
        let progress = if active.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / active.duration.as_secs_f64()).min(1.0) as f32
        };
        if progress > active.progress {
            active.progress = progress;
        }
        Some((active.id, active.progress))
    }

    /// When the active transition reaches full progress on the clock.
    pub fn deadline(&self) -> Option<Duration> {
        self.active
            .as_ref()
            .map(|active| active.started_at + active.duration)
    }

    pub fn active_id(&self) -> Option<TransitionId> {
        self.active.as_ref().map(|active| active.id)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.active.as_ref().map_or(0.0, |active| active.progress)
    }

    fn current_mut(&mut self, id: TransitionId) -> Result<&mut ActiveTransition, CarouselError> {
        match self.active.as_mut() {
            Some(active) if active.id == id => Ok(active),
            _ => Err(CarouselError::StaleCallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_begin_while_active_cancels_stale_transition() {
        let mut controller = TransitionController::new();
        let (first, cancelled) = controller.begin(ms(1000), ms(0));
        assert_eq!(cancelled, None);

        let (second, cancelled) = controller.begin(ms(1000), ms(10));
        assert_eq!(cancelled, Some(first));
        assert!(second.epoch() > first.epoch());

        assert_eq!(controller.complete(first), Err(CarouselError::StaleCallback));
        assert_eq!(controller.complete(second), Ok(()));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_progress_is_clamped_and_monotonic() {
        let mut controller = TransitionController::new();
        let (id, _) = controller.begin(ms(1000), ms(0));

        assert_eq!(controller.on_progress(id, 0.4), Ok(0.4));
        assert_eq!(controller.on_progress(id, 0.2), Ok(0.4));
        assert_eq!(controller.on_progress(id, f32::NAN), Ok(0.4));
        assert_eq!(controller.on_progress(id, 7.0), Ok(1.0));
    }

    #[test]
    fn test_cancel_invalidates_callbacks() {
        let mut controller = TransitionController::new();
        let (id, _) = controller.begin(ms(1000), ms(0));

        assert_eq!(controller.cancel(), Some(id));
        assert_eq!(controller.cancel(), None);
        assert_eq!(
            controller.on_progress(id, 0.5),
            Err(CarouselError::StaleCallback)
        );
        assert_eq!(controller.complete(id), Err(CarouselError::StaleCallback));
    }

    #[test]
    fn test_sample_follows_clock() {
        let mut controller = TransitionController::new();
        let (id, _) = controller.begin(ms(1000), ms(4000));

        assert_eq!(controller.deadline(), Some(ms(5000)));
        assert_eq!(controller.sample(ms(4250)), Some((id, 0.25)));
        assert_eq!(controller.sample(ms(4100)), Some((id, 0.25)));
        assert_eq!(controller.sample(ms(6000)), Some((id, 1.0)));
    }

    #[test]
    fn test_blend_style_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            blend: BlendStyle,
        }
        let parsed: Wrapper = toml::from_str("blend = \"slide\"").unwrap();
        assert_eq!(parsed.blend, BlendStyle::Slide);
        assert_eq!(BlendStyle::default().as_str(), "crossfade");
    }
}
