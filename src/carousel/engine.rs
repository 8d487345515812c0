//! Lifecycle manager tying the sequencer, scheduler and transition controller together.
//!
//! The engine is single-threaded and cooperative. The host calls
//! [`Carousel::update`] from its render loop with the current monotonic time and
//! reads the result back through [`Carousel::snapshot`] or [`Carousel::frame`].
//! Every cancellation (unmount, restart, hide) stops the timer and bumps the
//! transition epoch inside one `&mut self` call, so no callback can observe a
//! half torn-down instance.

use serde::Serialize;
use std::time::Duration;

use super::error::{CarouselError, validate_timing};
use super::scheduler::RotationScheduler;
use super::slides::{Slide, SlideSet, advance, next_index};
use super::state::{CarouselState, Phase, Snapshot};
use super::transition::{BlendStyle, ProgressDriver, TransitionController, TransitionId};
use crate::constants::{DEFAULT_INTERVAL_MS, DEFAULT_TRANSITION_MS};
use crate::render::Frame;

/// State changes produced by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CarouselEvent {
    TransitionStarted {
        epoch: u64,
        from: usize,
        to: usize,
        at_ms: u64,
    },
    TransitionCancelled {
        epoch: u64,
        at_ms: u64,
    },
    Advanced {
        current: usize,
        next: usize,
        at_ms: u64,
    },
}

/// An auto-rotating carousel over a [`SlideSet`].
#[derive(Debug)]
pub struct Carousel<P> {
    label: String,
    blend: BlendStyle,
    driver: ProgressDriver,
    debug_enabled: bool,
    visible: bool,
    slides: SlideSet<P>,
    interval: Duration,
    transition_duration: Duration,
    state: CarouselState,
    scheduler: RotationScheduler,
    transitions: TransitionController,
    fault: Option<CarouselError>,
    pending: Vec<CarouselEvent>,
    clock: Duration,
    advances: u64,
}

impl<P> Carousel<P> {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            blend: BlendStyle::default(),
            driver: ProgressDriver::default(),
            debug_enabled: false,
            visible: true,
            slides: SlideSet::empty(),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            transition_duration: Duration::from_millis(DEFAULT_TRANSITION_MS),
            state: CarouselState::new(),
            scheduler: RotationScheduler::new(),
            transitions: TransitionController::new(),
            fault: None,
            pending: Vec::new(),
            clock: Duration::ZERO,
            advances: 0,
        }
    }

    pub fn with_blend(mut self, blend: BlendStyle) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_driver(mut self, driver: ProgressDriver) -> Self {
        self.driver = driver;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    /// Start hidden; the first mount enters `Paused` until made visible.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    // # Lifecycle

    /// Mount on a slide set. Configuration and empty-set errors are returned
    /// after the engine has already settled into a safe non-rotating phase.
    pub fn mount(
        &mut self,
        slides: SlideSet<P>,
        interval: Duration,
        transition: Duration,
        now: Duration,
    ) -> Result<Phase, CarouselError> {
        if self.state.phase == Phase::TornDown {
            return Err(CarouselError::TornDown);
        }
        self.observe(now);
        self.release();

        self.slides = slides;
        self.interval = interval;
        self.transition_duration = transition;
        self.state = CarouselState::new();
        self.fault = None;

        let count = self.slides.len();
        if count == 0 {
            self.state.phase = Phase::Empty;
            self.debug(format_args!("mounted with no slides"));
            return Err(CarouselError::EmptySlideSet);
        }

        if let Err(err) = validate_timing(interval, transition) {
            self.degrade(err.clone());
            return Err(err);
        }

        if count == 1 {
            self.state.rest_at(0, 0, Phase::Static);
            self.debug(format_args!("mounted with a single slide, rotation disabled"));
            return Ok(Phase::Static);
        }

        self.state.rest_at(0, next_index(0, count)?, Phase::Uninitialized);
        let phase = self.start_rotation(now)?;
        self.debug(format_args!(
            "mounted {} slides, interval {} ms, transition {} ms",
            count,
            interval.as_millis(),
            transition.as_millis()
        ));
        Ok(phase)
    }

    /// Apply new inputs from the host.
    ///
    /// A slide set with a different identity or length restarts from slide 0.
    /// An interval change alone restarts only the timer and keeps the current slide.
    pub fn update_inputs(
        &mut self,
        slides: SlideSet<P>,
        interval: Duration,
        now: Duration,
    ) -> Result<Phase, CarouselError> {
        match self.state.phase {
            Phase::TornDown => return Err(CarouselError::TornDown),
            Phase::Uninitialized => {
                return self.mount(slides, interval, self.transition_duration, now);
            }
            _ => {}
        }
        self.observe(now);

        if !slides.same_identity(&self.slides) || slides.len() != self.slides.len() {
            self.debug(format_args!("slide set replaced, restarting"));
            self.release();
            self.state = CarouselState::new();
            return self.mount(slides, interval, self.transition_duration, now);
        }

        if interval == self.interval && self.fault.is_none() {
            return Ok(self.state.phase);
        }
        self.interval = interval;

        if self.state.phase == Phase::Empty {
            return Ok(Phase::Empty);
        }

        if let Err(err) = validate_timing(interval, self.transition_duration) {
            self.degrade(err.clone());
            return Err(err);
        }
        let recovering = self.fault.take().is_some();

        match self.state.phase {
            Phase::Static if recovering && self.slides.len() > 1 => {
                let next = next_index(0, self.slides.len())?;
                self.state.rest_at(0, next, Phase::Uninitialized);
                self.start_rotation(now)
            }
            Phase::Holding | Phase::Transitioning => {
                self.scheduler.start(interval, now)?;
                self.debug(format_args!(
                    "interval changed to {} ms, timer restarted",
                    interval.as_millis()
                ));
                Ok(self.state.phase)
            }
            phase => Ok(phase),
        }
    }

    /// Stop the timer, cancel any transition and enter the terminal phase.
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.state.phase == Phase::TornDown {
            return;
        }
        self.release();
        self.state.phase = Phase::TornDown;
        self.state.progress = 0.0;
        self.debug(format_args!("unmounted"));
    }

    /// Pause rotation while hidden and resume when shown again.
    pub fn set_visible(&mut self, visible: bool, now: Duration) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        self.observe(now);

        match (visible, self.state.phase) {
            (false, phase) if phase.is_rotating() => {
                self.release();
                let (current, next) = (self.state.current_index, self.state.next_index);
                self.state.rest_at(current, next, Phase::Paused);
                self.debug(format_args!("hidden, rotation paused"));
            }
            (true, Phase::Paused) => {
                if let Err(err) = self.start_rotation(now) {
                    self.degrade(err);
                }
                self.debug(format_args!("visible, rotation resumed"));
            }
            _ => {}
        }
    }

    // # Driving

    /// Process every tick and completion due at or before `now`, in time order.
    ///
    /// Under [`ProgressDriver::Host`] a tick that comes due mid-transition stays
    /// pending until the host reports completion, then fires on the next update.
    pub fn update(&mut self, now: Duration) -> Vec<CarouselEvent> {
        self.observe(now);

        while self.state.phase.is_rotating() {
            let completion_due = match self.driver {
                ProgressDriver::Clock => self.transitions.deadline(),
                ProgressDriver::Host => None,
            };
            let tick_due = self.tick_due();

            match (completion_due, tick_due) {
                (Some(done_at), tick) if done_at <= now && tick.is_none_or(|t| done_at <= t) => {
                    if let Some(id) = self.transitions.active_id() {
                        self.finish_transition(id, done_at);
                    }
                }
                (_, Some(tick_at)) if tick_at <= now => {
                    if self.scheduler.fire(now).is_some() {
                        self.start_transition(tick_at);
                    }
                }
                _ => break,
            }
        }

        if self.driver == ProgressDriver::Clock && self.state.phase == Phase::Transitioning {
            if let Some((_, progress)) = self.transitions.sample(now) {
                self.state.progress = progress;
            }
        }

        std::mem::take(&mut self.pending)
    }

    /// Begin a transition immediately, as a tick would.
    ///
    /// A transition already in flight is cancelled without advancing, so two
    /// calls in quick succession still advance the index only once.
    pub fn begin_transition(&mut self, now: Duration) -> Option<TransitionId> {
        if !self.state.phase.is_rotating() {
            return None;
        }
        self.observe(now);
        Some(self.start_transition(now))
    }

    /// Progress reported by a host animation. Returns `false` for stale ids.
    pub fn on_transition_progress(&mut self, id: TransitionId, progress: f32) -> bool {
        match self.transitions.on_progress(id, progress) {
            Ok(progress) => {
                self.state.progress = progress;
                true
            }
            Err(_) => {
                self.debug(format_args!("dropped stale progress for epoch {}", id.epoch()));
                false
            }
        }
    }

    /// Completion reported by a host animation. Returns `false` for stale ids.
    pub fn on_transition_complete(&mut self, id: TransitionId) -> bool {
        let at = self.clock;
        self.finish_transition(id, at)
    }

    // # Queries

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.state)
    }

    /// Borrowed render view, or `None` when there is nothing to paint.
    pub fn frame(&self) -> Option<Frame<'_, P>> {
        Frame::capture(self.snapshot(), self.blend, &self.slides)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn blend(&self) -> BlendStyle {
        self.blend
    }

    pub fn driver(&self) -> ProgressDriver {
        self.driver
    }

    pub fn slides(&self) -> &SlideSet<P> {
        &self.slides
    }

    pub fn current_slide(&self) -> Option<&Slide<P>> {
        self.displayable()
            .then(|| self.slides.get(self.state.current_index))
            .flatten()
    }

    pub fn next_slide(&self) -> Option<&Slide<P>> {
        self.displayable()
            .then(|| self.slides.get(self.state.next_index))
            .flatten()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn transition_duration(&self) -> Duration {
        self.transition_duration
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn has_timer(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn active_transition(&self) -> Option<TransitionId> {
        self.transitions.active_id()
    }

    /// The configuration error that put the engine into `Static`, if any.
    pub fn fault(&self) -> Option<&CarouselError> {
        self.fault.as_ref()
    }

    /// Number of committed index advances since construction.
    pub fn advance_count(&self) -> u64 {
        self.advances
    }

    /// Earliest moment at which `update` has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        let completion = match self.driver {
            ProgressDriver::Clock => self.transitions.deadline(),
            ProgressDriver::Host => None,
        };
        match (completion, self.tick_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // # Internals

    /// Next tick the update loop may consume. A host-driven transition holds it back.
    fn tick_due(&self) -> Option<Duration> {
        match (self.driver, self.state.phase) {
            (ProgressDriver::Host, Phase::Transitioning) => None,
            _ => self.scheduler.next_due(),
        }
    }

    fn start_rotation(&mut self, now: Duration) -> Result<Phase, CarouselError> {
        let (current, next) = (self.state.current_index, self.state.next_index);
        if !self.visible {
            self.state.rest_at(current, next, Phase::Paused);
            return Ok(Phase::Paused);
        }
        self.scheduler.start(self.interval, now)?;
        self.state.rest_at(current, next, Phase::Holding);
        Ok(Phase::Holding)
    }

    fn start_transition(&mut self, at: Duration) -> TransitionId {
        let (id, cancelled) = self.transitions.begin(self.transition_duration, at);
        if let Some(stale) = cancelled {
            self.debug(format_args!(
                "transition epoch {} superseded by {}",
                stale.epoch(),
                id.epoch()
            ));
            self.pending.push(CarouselEvent::TransitionCancelled {
                epoch: stale.epoch(),
                at_ms: millis(at),
            });
        }
        self.state.phase = Phase::Transitioning;
        self.state.progress = 0.0;
        self.pending.push(CarouselEvent::TransitionStarted {
            epoch: id.epoch(),
            from: self.state.current_index,
            to: self.state.next_index,
            at_ms: millis(at),
        });
        id
    }

    fn finish_transition(&mut self, id: TransitionId, at: Duration) -> bool {
        if self.state.phase != Phase::Transitioning || self.transitions.complete(id).is_err() {
            self.debug(format_args!("dropped stale completion for epoch {}", id.epoch()));
            return false;
        }

        match advance(self.state.current_index, self.slides.len()) {
            Ok((current, next)) => {
                self.state.rest_at(current, next, Phase::Holding);
                self.advances += 1;
                self.pending.push(CarouselEvent::Advanced {
                    current,
                    next,
                    at_ms: millis(at),
                });
                true
            }
            Err(err) => {
                self.degrade(err);
                false
            }
        }
    }

    /// Release the timer and invalidate the transition epoch.
    fn release(&mut self) {
        let stopped = self.scheduler.stop();
        if let Some(stale) = self.transitions.cancel() {
            self.pending.push(CarouselEvent::TransitionCancelled {
                epoch: stale.epoch(),
                at_ms: millis(self.clock),
            });
        }
        if stopped {
            self.debug(format_args!("timer released"));
        }
    }

    /// Fall back to showing the first slide without rotating.
    fn degrade(&mut self, err: CarouselError) {
        self.release();
        let next = next_index(0, self.slides.len()).unwrap_or(0);
        let phase = if self.slides.is_empty() {
            Phase::Empty
        } else {
            Phase::Static
        };
        self.state.rest_at(0, next, phase);
        self.debug(format_args!("rotation disabled: {err}"));
        self.fault = Some(err);
    }

    fn displayable(&self) -> bool {
        !matches!(
            self.state.phase,
            Phase::Uninitialized | Phase::Empty | Phase::TornDown
        )
    }

    fn observe(&mut self, now: Duration) {
        self.clock = self.clock.max(now);
    }

    fn debug(&self, message: std::fmt::Arguments<'_>) {
        if self.debug_enabled {
            log_debug!("Carousel '{}': {}", self.label, message);
        }
    }
}

impl<P> Drop for Carousel<P> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn millis(at: Duration) -> u64 {
    at.as_millis() as u64
}
