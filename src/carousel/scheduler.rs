//! Rotation scheduler: a single repeating timer per engine instance.
//!
//! The scheduler does not own a thread or a clock. It records when the next
//! tick is due and the host loop asks it, through [`RotationScheduler::fire`],
//! whether that moment has passed. Ticks are anchored to the start time, so
//! tick `k` is due at `start + k * interval` no matter how late the host polls.

use std::time::Duration;

use super::error::CarouselError;

/// Identifier of a started timer, handed back to the caller on `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Ownership token for the outstanding timer. Deliberately not `Clone`.
#[derive(Debug)]
pub struct TimerHandle {
    id: TimerId,
    interval: Duration,
    next_due: Duration,
}

impl TimerHandle {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }
}

/// Owns at most one [`TimerHandle`].
#[derive(Debug, Default)]
pub struct RotationScheduler {
    active: Option<TimerHandle>,
    issued: u64,
}

impl RotationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating timer, releasing any timer that was already running.
    pub fn start(&mut self, interval: Duration, now: Duration) -> Result<TimerId, CarouselError> {
        self.stop();

        if interval.is_zero() {
            return Err(CarouselError::InvalidInterval);
        }

        self.issued += 1;
        let id = TimerId(self.issued);
        self.active = Some(TimerHandle {
            id,
            interval,
            next_due: now + interval,
        });
        Ok(id)
    }

    /// Release the outstanding timer. Returns whether there was one.
    pub fn stop(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<&TimerHandle> {
        self.active.as_ref()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.active.as_ref().map(|handle| handle.next_due)
    }

    /// Consume one due tick, if any, and re-arm for the following interval.
    ///
    /// Call repeatedly to catch up on several missed ticks.
    pub fn fire(&mut self, now: Duration) -> Option<TimerId> {
        let handle = self.active.as_mut()?;
        if handle.next_due > now {
            return None;
        }
        handle.next_due += handle.interval;
        Some(handle.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_fire_respects_interval() {
        let mut scheduler = RotationScheduler::new();
        let id = scheduler.start(ms(4000), ms(0)).unwrap();

        assert_eq!(scheduler.fire(ms(3999)), None);
        assert_eq!(scheduler.fire(ms(4000)), Some(id));
        assert_eq!(scheduler.fire(ms(4000)), None);
        assert_eq!(scheduler.next_due(), Some(ms(8000)));
    }

    #[test]
    fn test_late_poll_catches_up_one_tick_per_call() {
        let mut scheduler = RotationScheduler::new();
        scheduler.start(ms(1000), ms(0)).unwrap();

        let mut fired = 0;
        while scheduler.fire(ms(3500)).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(scheduler.next_due(), Some(ms(4000)));
    }

    #[test]
    fn test_restart_replaces_outstanding_timer() {
        let mut scheduler = RotationScheduler::new();
        let first = scheduler.start(ms(1000), ms(0)).unwrap();
        let second = scheduler.start(ms(2000), ms(500)).unwrap();

        assert_ne!(first, second);
        assert_eq!(scheduler.handle().map(|h| h.id()), Some(second));
        assert_eq!(scheduler.fire(ms(1000)), None);
        assert_eq!(scheduler.fire(ms(2500)), Some(second));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut scheduler = RotationScheduler::new();
        assert!(!scheduler.stop());

        scheduler.start(ms(1000), ms(0)).unwrap();
        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.fire(ms(10_000)), None);
    }

    #[test]
    fn test_zero_interval_leaves_nothing_scheduled() {
        let mut scheduler = RotationScheduler::new();
        scheduler.start(ms(1000), ms(0)).unwrap();

        assert_eq!(
            scheduler.start(Duration::ZERO, ms(0)),
            Err(CarouselError::InvalidInterval)
        );
        assert!(!scheduler.is_running());
    }
}
