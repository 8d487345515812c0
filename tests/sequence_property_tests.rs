use carousel_engine::carousel::{Carousel, Phase, Slide, SlideSet, next_index};
use carousel_engine::logger::Log;
use proptest::prelude::*;
use std::time::Duration;

/// Slide counts that rotate
fn slide_count_strategy() -> impl Strategy<Value = usize> {
    2..12usize
}

/// (interval, transition) pairs in milliseconds with transition <= interval
fn timing_strategy() -> impl Strategy<Value = (u64, u64)> {
    (1u64..5_000).prop_flat_map(|interval| (Just(interval), 1..=interval))
}

/// Sorted poll times within a minute
fn poll_times_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..60_000, 1..40).prop_map(|mut times| {
        times.sort_unstable();
        times
    })
}

fn numbered(count: usize) -> SlideSet<usize> {
    (0..count)
        .map(|i| Slide::new(format!("slide-{i}"), i))
        .collect::<Vec<_>>()
        .into()
}

/// Completions that have happened by `t` for an anchored timer started at 0.
fn expected_advances(t: u64, interval: u64, transition: u64) -> u64 {
    if t < interval + transition {
        0
    } else {
        (t - transition) / interval
    }
}

#[cfg(test)]
mod sequencer_tests {
    use super::*;

    proptest! {
        /// The successor wraps around the end of the set
        #[test]
        fn test_next_index_wraps(count in 1..100usize, offset in 0..100usize) {
            let current = offset % count;
            prop_assert_eq!(next_index(current, count), Ok((current + 1) % count));
        }

        /// Any index stays in range after repeated advancing
        #[test]
        fn test_next_index_stays_in_range(count in 1..50usize, steps in 0..200usize) {
            let mut current = 0;
            for _ in 0..steps {
                current = next_index(current, count).unwrap();
                prop_assert!(current < count);
            }
            prop_assert_eq!(current, steps % count);
        }
    }
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    proptest! {
        /// Polling at arbitrary moments never loses or duplicates an advance
        #[test]
        fn test_advance_count_matches_anchored_schedule(
            count in slide_count_strategy(),
            (interval, transition) in timing_strategy(),
            polls in poll_times_strategy()
        ) {
            Log::set_enabled(false);
            let mut carousel = Carousel::new("prop");
            carousel
                .mount(
                    numbered(count),
                    Duration::from_millis(interval),
                    Duration::from_millis(transition),
                    Duration::ZERO,
                )
                .unwrap();

            for t in polls {
                carousel.update(Duration::from_millis(t));
                let expected = expected_advances(t, interval, transition);
                let snapshot = carousel.snapshot();

                prop_assert_eq!(carousel.advance_count(), expected);
                prop_assert_eq!(snapshot.current_index, (expected % count as u64) as usize);
                prop_assert_eq!(snapshot.next_index, (snapshot.current_index + 1) % count);
                prop_assert!((0.0..=1.0).contains(&snapshot.progress));
            }
        }

        /// A live timer only ever exists while the carousel is rotating
        #[test]
        fn test_timer_implies_rotating_phase(
            count in 0..6usize,
            (interval, transition) in timing_strategy(),
            polls in poll_times_strategy(),
            hide_at in prop::option::of(0u64..60_000)
        ) {
            Log::set_enabled(false);
            let mut carousel = Carousel::new("prop");
            let _ = carousel.mount(
                numbered(count),
                Duration::from_millis(interval),
                Duration::from_millis(transition),
                Duration::ZERO,
            );

            for t in polls {
                let now = Duration::from_millis(t);
                if hide_at.is_some_and(|h| h <= t) {
                    carousel.set_visible(false, now);
                }
                carousel.update(now);

                let phase = carousel.phase();
                if carousel.has_timer() {
                    prop_assert!(phase.is_rotating(), "timer alive in {:?}", phase);
                }
                if count <= 1 {
                    prop_assert!(!carousel.has_timer());
                    prop_assert!(matches!(phase, Phase::Static | Phase::Empty));
                }
            }

            carousel.unmount();
            prop_assert!(!carousel.has_timer());
            prop_assert_eq!(carousel.phase(), Phase::TornDown);
        }

        /// Replacing the slide set always restarts from the first slide
        #[test]
        fn test_replacing_slides_restarts_at_zero(
            count in slide_count_strategy(),
            replacement in 1..8usize,
            at in 0u64..30_000
        ) {
            Log::set_enabled(false);
            let mut carousel = Carousel::new("prop");
            let interval = Duration::from_millis(1000);
            carousel
                .mount(numbered(count), interval, Duration::from_millis(300), Duration::ZERO)
                .unwrap();
            let now = Duration::from_millis(at);
            carousel.update(now);

            let _ = carousel.update_inputs(numbered(replacement), interval, now);
            let snapshot = carousel.snapshot();

            prop_assert_eq!(snapshot.current_index, 0);
            prop_assert_eq!(snapshot.next_index, 1 % replacement);
            prop_assert_eq!(carousel.active_transition(), None);
        }
    }
}
