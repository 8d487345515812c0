//! Screen-level host that owns several independent carousels.
//!
//! The host is the bridge between configuration and engines. It reconciles the
//! configured `[[carousel]]` entries with the running engines on every load or
//! reload, drives them all from one clock, and hands their frames to a renderer.
//!
//! Reconciliation rules:
//! - new entries are mounted, removed entries are unmounted
//! - a changed blend style or transition duration rebuilds the engine
//! - changed slide content produces a new slide set (full restart from slide 0)
//! - unchanged slide content reuses the running set, so an interval-only
//!   change keeps the carousel on its current slide

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::carousel::{BlendStyle, Carousel, CarouselError, CarouselEvent, Slide, SlideSet};
use crate::config::Config;
use crate::render::SlideRenderer;

/// Payload carried by every slide shown by the CLI host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideContent {
    pub title: String,
    pub image: Option<String>,
    pub cta: Option<String>,
}

/// One configured carousel with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCarousel {
    pub name: String,
    pub interval: Duration,
    pub transition: Duration,
    pub blend: BlendStyle,
    pub slides: Vec<Slide<SlideContent>>,
}

impl ResolvedCarousel {
    /// Apply top-level defaults to every `[[carousel]]` entry, in file order.
    pub fn from_config(config: &Config) -> Vec<Self> {
        config
            .carousels
            .iter()
            .map(|entry| Self {
                name: entry.name.clone(),
                interval: Duration::from_millis(config.interval_for(entry)),
                transition: Duration::from_millis(config.transition_for(entry)),
                blend: config.blend_for(entry),
                slides: entry
                    .slides
                    .iter()
                    .map(|slide| {
                        Slide::new(
                            slide.id.clone(),
                            SlideContent {
                                title: slide.title.clone().unwrap_or_else(|| slide.id.clone()),
                                image: slide.image.clone(),
                                cta: slide.cta.clone(),
                            },
                        )
                    })
                    .collect(),
            })
            .collect()
    }
}

/// An engine event tagged with the carousel it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostEvent {
    pub carousel: String,
    #[serde(flatten)]
    pub event: CarouselEvent,
}

/// A problem reported while mounting or updating a carousel.
#[derive(Debug, Clone, PartialEq)]
pub struct HostIssue {
    pub carousel: String,
    pub error: CarouselError,
}

struct Hosted {
    spec: ResolvedCarousel,
    engine: Carousel<SlideContent>,
}

/// Owns the carousels of one screen.
pub struct CarouselHost {
    carousels: Vec<Hosted>,
    visible: bool,
    pause_when_hidden: bool,
    debug_enabled: bool,
}

impl CarouselHost {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            carousels: Vec::new(),
            visible: true,
            pause_when_hidden: true,
            debug_enabled,
        }
    }

    /// Reconcile running carousels with `config`. Issues are logged and returned.
    pub fn apply_config(&mut self, config: &Config, now: Duration) -> Vec<HostIssue> {
        self.pause_when_hidden = config.pause_when_hidden();

        let mut running: HashMap<String, Hosted> = self
            .carousels
            .drain(..)
            .map(|hosted| (hosted.spec.name.clone(), hosted))
            .collect();
        let mut issues = Vec::new();

        for spec in ResolvedCarousel::from_config(config) {
            let name = spec.name.clone();
            let (hosted, result) = match running.remove(&name) {
                Some(existing) => self.reconcile(existing, spec, now),
                None => {
                    if self.debug_enabled {
                        log_debug!("Mounting carousel '{}'", name);
                    }
                    self.mount_new(spec, now)
                }
            };
            if let Err(error) = result {
                report_issue(&name, &error);
                issues.push(HostIssue {
                    carousel: name,
                    error,
                });
            }
            self.carousels.push(hosted);
        }

        for (name, mut removed) in running {
            if self.debug_enabled {
                log_debug!("Unmounting removed carousel '{}'", name);
            }
            removed.engine.unmount();
        }

        // `pause_when_hidden` may have changed while the screen is hidden.
        let effective = self.effective_visibility();
        for hosted in &mut self.carousels {
            hosted.engine.set_visible(effective, now);
        }

        issues
    }

    /// Drive every carousel to `now`.
    pub fn update(&mut self, now: Duration) -> Vec<HostEvent> {
        let mut events = Vec::new();
        for hosted in &mut self.carousels {
            events.extend(hosted.engine.update(now).into_iter().map(|event| HostEvent {
                carousel: hosted.spec.name.clone(),
                event,
            }));
        }
        events
    }

    /// Screen visibility. Only pauses rotation when the config asks for it.
    pub fn set_visible(&mut self, visible: bool, now: Duration) {
        self.visible = visible;
        let effective = self.effective_visibility();
        for hosted in &mut self.carousels {
            hosted.engine.set_visible(effective, now);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Time from `now` until the earliest carousel has work, if any does.
    pub fn next_wake(&self, now: Duration) -> Option<Duration> {
        self.carousels
            .iter()
            .filter_map(|hosted| hosted.engine.next_deadline())
            .min()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// Paint every carousel, then flush the renderer once.
    pub fn render(&self, renderer: &mut dyn SlideRenderer<SlideContent>) -> Result<()> {
        for hosted in &self.carousels {
            match hosted.engine.frame() {
                Some(frame) => renderer.render(&hosted.spec.name, &frame)?,
                None => renderer.clear(&hosted.spec.name)?,
            }
        }
        renderer.flush()
    }

    /// Unmount every carousel. Safe to call more than once.
    pub fn shutdown(&mut self) {
        for hosted in &mut self.carousels {
            hosted.engine.unmount();
        }
        if self.debug_enabled && !self.carousels.is_empty() {
            log_debug!("Released {} carousel timer(s)", self.carousels.len());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Carousel<SlideContent>> {
        self.carousels
            .iter()
            .find(|hosted| hosted.spec.name == name)
            .map(|hosted| &hosted.engine)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.carousels.iter().map(|hosted| hosted.spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.carousels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carousels.is_empty()
    }

    fn effective_visibility(&self) -> bool {
        self.visible || !self.pause_when_hidden
    }

    fn engine_for(&self, spec: &ResolvedCarousel) -> Carousel<SlideContent> {
        let engine = Carousel::new(spec.name.clone())
            .with_blend(spec.blend)
            .with_debug(self.debug_enabled);
        if self.effective_visibility() {
            engine
        } else {
            engine.hidden()
        }
    }

    fn mount_new(
        &self,
        spec: ResolvedCarousel,
        now: Duration,
    ) -> (Hosted, Result<(), CarouselError>) {
        let mut engine = self.engine_for(&spec);
        let result = engine
            .mount(
                SlideSet::new(spec.slides.clone()),
                spec.interval,
                spec.transition,
                now,
            )
            .map(|_| ());
        (Hosted { spec, engine }, result)
    }

    fn reconcile(
        &self,
        mut existing: Hosted,
        spec: ResolvedCarousel,
        now: Duration,
    ) -> (Hosted, Result<(), CarouselError>) {
        if existing.spec.blend != spec.blend || existing.spec.transition != spec.transition {
            if self.debug_enabled {
                log_debug!("Rebuilding carousel '{}' for new blend settings", spec.name);
            }
            existing.engine.unmount();
            return self.mount_new(spec, now);
        }

        let candidate = SlideSet::new(spec.slides.clone());
        let slides = if existing.engine.slides().same_content(&candidate) {
            existing.engine.slides().clone()
        } else {
            candidate
        };
        let result = existing
            .engine
            .update_inputs(slides, spec.interval, now)
            .map(|_| ());
        existing.spec = spec;
        (existing, result)
    }
}

impl Drop for CarouselHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn report_issue(name: &str, error: &CarouselError) {
    match error {
        CarouselError::EmptySlideSet => {
            log_warning!("Carousel '{}' has no slides and will stay empty", name);
        }
        error if error.is_configuration() => {
            log_warning!("Carousel '{}' will not rotate: {}", name, error);
        }
        error => {
            log_warning!("Carousel '{}': {}", name, error);
        }
    }
}
