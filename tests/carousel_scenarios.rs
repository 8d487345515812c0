//! End-to-end rotation scenarios driven through the public API.

use carousel_engine::carousel::{
    BlendStyle, Carousel, CarouselError, CarouselEvent, Phase, ProgressDriver, Slide, SlideSet,
};
use carousel_engine::config::loading::parse_config;
use carousel_engine::host::CarouselHost;
use carousel_engine::logger::Log;
use carousel_engine::render::{JsonRenderer, Layers};
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn letters(ids: &[&'static str]) -> SlideSet<&'static str> {
    ids.iter().map(|id| Slide::new(*id, *id)).collect::<Vec<_>>().into()
}

fn current_id(carousel: &Carousel<&'static str>) -> &'static str {
    carousel.current_slide().map(|slide| slide.payload).unwrap_or("-")
}

fn next_id(carousel: &Carousel<&'static str>) -> &'static str {
    carousel.next_slide().map(|slide| slide.payload).unwrap_or("-")
}

#[test]
fn abc_rotation_follows_the_documented_timeline() {
    Log::set_enabled(false);
    let mut carousel = Carousel::new("abc");
    let phase = carousel
        .mount(letters(&["A", "B", "C"]), ms(4000), ms(1000), ms(0))
        .unwrap();

    assert_eq!(phase, Phase::Holding);
    assert_eq!((current_id(&carousel), next_id(&carousel)), ("A", "B"));

    carousel.update(ms(4000));
    assert_eq!(carousel.phase(), Phase::Transitioning);
    assert_eq!(next_id(&carousel), "B");

    carousel.update(ms(5000));
    assert_eq!(carousel.phase(), Phase::Holding);
    assert_eq!((current_id(&carousel), next_id(&carousel)), ("B", "C"));

    carousel.update(ms(9000));
    assert_eq!((current_id(&carousel), next_id(&carousel)), ("C", "A"));

    carousel.update(ms(13_000));
    assert_eq!((current_id(&carousel), next_id(&carousel)), ("A", "B"));
    assert_eq!(carousel.advance_count(), 3);
}

#[test]
fn single_slide_stays_static_forever() {
    Log::set_enabled(false);
    let mut carousel = Carousel::new("x");
    let phase = carousel
        .mount(letters(&["X"]), ms(4000), ms(1000), ms(0))
        .unwrap();

    assert_eq!(phase, Phase::Static);
    for t in [0, 4000, 5000, 60_000, 3_600_000] {
        assert!(carousel.update(ms(t)).is_empty());
        assert_eq!((current_id(&carousel), next_id(&carousel)), ("X", "X"));
        assert_eq!(carousel.phase(), Phase::Static);
        assert!(!carousel.has_timer());
        assert_eq!(carousel.next_deadline(), None);
    }
}

#[test]
fn empty_set_mounts_without_timer_or_panic() {
    Log::set_enabled(false);
    let mut carousel: Carousel<&'static str> = Carousel::new("empty");

    assert_eq!(
        carousel.mount(SlideSet::empty(), ms(4000), ms(1000), ms(0)),
        Err(CarouselError::EmptySlideSet)
    );
    assert_eq!(carousel.phase(), Phase::Empty);
    assert!(!carousel.has_timer());
    assert!(carousel.frame().is_none());
    assert!(carousel.update(ms(10_000)).is_empty());
}

#[test]
fn configuration_errors_fall_back_to_first_slide() {
    Log::set_enabled(false);
    for (interval, transition) in [(0, 1000), (4000, 0), (1000, 4000)] {
        let mut carousel = Carousel::new("bad");
        let result = carousel.mount(letters(&["A", "B"]), ms(interval), ms(transition), ms(0));

        let error = result.unwrap_err();
        assert!(error.is_configuration(), "{error}");
        assert_eq!(carousel.phase(), Phase::Static);
        assert_eq!(current_id(&carousel), "A");
        assert!(!carousel.has_timer());
        assert!(carousel.frame().is_some());
    }
}

#[test]
fn teardown_mid_transition_drops_late_completion() {
    Log::set_enabled(false);
    let mut carousel = Carousel::new("host").with_driver(ProgressDriver::Host);
    carousel
        .mount(letters(&["A", "B", "C"]), ms(1000), ms(300), ms(0))
        .unwrap();
    carousel.update(ms(1000));
    let id = carousel.active_transition().unwrap();

    carousel.unmount();
    carousel.unmount();

    assert!(!carousel.on_transition_progress(id, 0.5));
    assert!(!carousel.on_transition_complete(id));
    assert_eq!(carousel.phase(), Phase::TornDown);
    assert_eq!(carousel.advance_count(), 0);
    assert!(carousel.update(ms(10_000)).is_empty());
    assert_eq!(
        carousel.mount(letters(&["A"]), ms(1000), ms(300), ms(0)),
        Err(CarouselError::TornDown)
    );
}

#[test]
fn new_slide_set_resets_from_any_phase() {
    Log::set_enabled(false);
    let mut carousel = Carousel::new("restart");
    carousel
        .mount(letters(&["A", "B", "C"]), ms(1000), ms(500), ms(0))
        .unwrap();
    carousel.update(ms(2200));
    assert_eq!(carousel.phase(), Phase::Transitioning);
    assert_eq!(current_id(&carousel), "B");

    let phase = carousel
        .update_inputs(letters(&["D", "E"]), ms(1000), ms(2300))
        .unwrap();

    assert_eq!(phase, Phase::Holding);
    assert_eq!((current_id(&carousel), next_id(&carousel)), ("D", "E"));
    assert_eq!(carousel.active_transition(), None);
    assert_eq!(carousel.next_deadline(), Some(ms(3300)));
}

#[test]
fn duplicate_begin_advances_once() {
    Log::set_enabled(false);
    let mut carousel = Carousel::new("dup").with_driver(ProgressDriver::Host);
    carousel
        .mount(letters(&["A", "B", "C"]), ms(10_000), ms(500), ms(0))
        .unwrap();

    let first = carousel.begin_transition(ms(100)).unwrap();
    let second = carousel.begin_transition(ms(110)).unwrap();

    assert!(!carousel.on_transition_complete(first));
    assert!(carousel.on_transition_complete(second));
    assert_eq!(carousel.advance_count(), 1);
    assert_eq!(current_id(&carousel), "B");
}

#[test]
fn blend_layers_follow_progress() {
    Log::set_enabled(false);
    let mut carousel = Carousel::new("fade").with_blend(BlendStyle::Crossfade);
    carousel
        .mount(letters(&["A", "B"]), ms(2000), ms(1000), ms(0))
        .unwrap();
    carousel.update(ms(2250));

    let frame = carousel.frame().unwrap();
    assert_eq!(frame.foreground.payload, "A");
    assert_eq!(frame.background.payload, "B");
    assert_eq!(frame.layers, Layers::compute(&frame.snapshot, BlendStyle::Crossfade));
    assert_eq!(frame.layers.foreground.opacity, 0.75);
    assert_eq!(frame.layers.background.opacity, 1.0);
}

#[test]
fn host_runs_independent_carousels_from_toml() {
    Log::set_enabled(false);
    let config = parse_config(
        r#"
interval_ms = 1000
transition_ms = 250

[[carousel]]
name = "hero"
slides = [{ id = "a" }, { id = "b" }, { id = "c" }]

[[carousel]]
name = "promo"
interval_ms = 3000
slides = [{ id = "x" }, { id = "y" }]
"#,
    )
    .unwrap();

    let mut host = CarouselHost::new(false);
    assert!(host.apply_config(&config, ms(0)).is_empty());

    let events = host.update(ms(3250));
    let hero_advances = events
        .iter()
        .filter(|e| e.carousel == "hero" && matches!(e.event, CarouselEvent::Advanced { .. }))
        .count();
    let promo_advances = events
        .iter()
        .filter(|e| e.carousel == "promo" && matches!(e.event, CarouselEvent::Advanced { .. }))
        .count();

    assert_eq!(hero_advances, 3);
    assert_eq!(promo_advances, 1);
    assert_eq!(host.get("hero").unwrap().snapshot().current_index, 0);
    assert_eq!(host.get("promo").unwrap().snapshot().current_index, 1);

    let mut renderer = JsonRenderer::new(Vec::new());
    renderer.set_time(3250);
    host.render(&mut renderer).unwrap();
    let output = String::from_utf8(renderer.into_inner()).unwrap();
    assert_eq!(output.lines().count(), 2);
    assert!(output.contains("\"carousel\":\"promo\""));

    host.shutdown();
    assert_eq!(host.next_wake(ms(3250)), None);
}
