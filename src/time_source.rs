//! Monotonic time for the carousel host, real or simulated.
//!
//! Engines never read a clock themselves: the host asks the global time source
//! for `now()` (a [`Duration`] since the source started) and passes it down.
//! Swapping in [`SimulatedTimeSource`] therefore replays an arbitrary stretch of
//! rotation in a fraction of the wall time, which `carousel simulate` uses.

use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

#[cfg_attr(test, mockall::automock)]
pub trait TimeSource: Send + Sync {
    /// Monotonic time since the source was created.
    fn now(&self) -> Duration;

    /// Sleep for `duration` (or pretend to).
    fn sleep(&self, duration: Duration);

    fn is_simulated(&self) -> bool;

    /// Whether a simulation has reached its end (always false for real time).
    fn is_ended(&self) -> bool {
        false
    }
}

/// Wall-clock monotonic time.
pub struct RealTimeSource {
    started: Instant,
}

impl RealTimeSource {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for RealTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// Simulated time running from zero to `end`.
///
/// Two modes:
/// - fast-forward (`multiplier == 0.0`): `sleep` jumps the clock instantly
/// - accelerated: time flows at `multiplier` simulated seconds per real second
pub struct SimulatedTimeSource {
    end: Duration,
    multiplier: f64,
    /// Committed simulated time.
    elapsed: Mutex<Duration>,
    /// Accelerated mode only: real start of the current sleep and its simulated length.
    sleep_in_progress: Mutex<Option<(Instant, Duration)>>,
}

impl SimulatedTimeSource {
    pub fn new(end: Duration, multiplier: f64) -> Self {
        Self {
            end,
            multiplier: if multiplier.is_finite() && multiplier > 0.0 {
                multiplier
            } else {
                0.0
            },
            elapsed: Mutex::new(Duration::ZERO),
            sleep_in_progress: Mutex::new(None),
        }
    }

    pub fn is_fast_forward(&self) -> bool {
        self.multiplier == 0.0
    }

    pub fn end(&self) -> Duration {
        self.end
    }

    fn current(&self) -> Duration {
        let committed = *lock(&self.elapsed);
        let partial = match *lock(&self.sleep_in_progress) {
            Some((started, length)) => {
                let simulated = started.elapsed().as_secs_f64() * self.multiplier;
                Duration::from_secs_f64(simulated).min(length)
            }
            None => Duration::ZERO,
        };
        (committed + partial).min(self.end)
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> Duration {
        self.current()
    }

    fn sleep(&self, duration: Duration) {
        let step = {
            let elapsed = lock(&self.elapsed);
            duration.min(self.end.saturating_sub(*elapsed))
        };
        if step.is_zero() {
            return;
        }

        if self.is_fast_forward() {
            *lock(&self.elapsed) += step;
            std::thread::yield_now();
            return;
        }

        *lock(&self.sleep_in_progress) = Some((Instant::now(), step));
        std::thread::sleep(Duration::from_secs_f64(
            step.as_secs_f64() / self.multiplier,
        ));
        // Commit only after the real sleep so `now` never runs ahead.
        *lock(&self.sleep_in_progress) = None;
        *lock(&self.elapsed) += step;
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.current() >= self.end
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sleep until the next carousel deadline, but never longer than one frame.
/// Returns how long was requested.
pub fn sleep_until_next(source: &dyn TimeSource, wake: Option<Duration>, frame: Duration) -> Duration {
    let step = wake.map_or(frame, |wake| wake.min(frame));
    // A deadline that is already due still yields for a millisecond.
    let step = step.max(Duration::from_millis(1));
    source.sleep(step);
    step
}

// # Global Source

/// Install the global time source. Only the first call has an effect.
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

fn global() -> &'static Arc<dyn TimeSource> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource::new()))
}

pub fn now() -> Duration {
    global().now()
}

pub fn sleep(duration: Duration) {
    global().sleep(duration)
}

pub fn is_simulated() -> bool {
    global().is_simulated()
}

pub fn source() -> Arc<dyn TimeSource> {
    Arc::clone(global())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_fast_forward_jumps_and_caps_at_end() {
        let source = SimulatedTimeSource::new(ms(1000), 0.0);
        assert!(source.is_fast_forward());
        assert_eq!(source.now(), Duration::ZERO);

        source.sleep(ms(400));
        assert_eq!(source.now(), ms(400));
        assert!(!source.is_ended());

        source.sleep(ms(5000));
        assert_eq!(source.now(), ms(1000));
        assert!(source.is_ended());

        source.sleep(ms(10));
        assert_eq!(source.now(), ms(1000));
    }

    #[test]
    fn test_accelerated_mode_commits_full_step() {
        let source = SimulatedTimeSource::new(ms(10_000), 1000.0);
        assert!(!source.is_fast_forward());

        source.sleep(ms(2000));
        assert_eq!(source.now(), ms(2000));
    }

    #[test]
    fn test_invalid_multiplier_falls_back_to_fast_forward() {
        assert!(SimulatedTimeSource::new(ms(1), -3.0).is_fast_forward());
        assert!(SimulatedTimeSource::new(ms(1), f64::NAN).is_fast_forward());
    }

    #[test]
    fn test_real_time_source_is_monotonic() {
        let source = RealTimeSource::new();
        let first = source.now();
        let second = source.now();
        assert!(second >= first);
        assert!(!source.is_simulated());
        assert!(!source.is_ended());
    }

    #[test]
    fn test_sleep_until_next_prefers_earlier_deadline() {
        let mut source = MockTimeSource::new();
        source.expect_sleep().with(eq(ms(12))).times(1).return_const(());
        assert_eq!(sleep_until_next(&source, Some(ms(12)), ms(33)), ms(12));
    }

    #[test]
    fn test_sleep_until_next_caps_at_frame_interval() {
        let mut source = MockTimeSource::new();
        source.expect_sleep().with(eq(ms(33))).times(2).return_const(());
        assert_eq!(sleep_until_next(&source, Some(ms(4000)), ms(33)), ms(33));
        assert_eq!(sleep_until_next(&source, None, ms(33)), ms(33));
    }

    #[test]
    fn test_sleep_until_next_never_spins() {
        let mut source = MockTimeSource::new();
        source.expect_sleep().with(eq(ms(1))).times(1).return_const(());
        assert_eq!(sleep_until_next(&source, Some(Duration::ZERO), ms(33)), ms(1));
    }
}
