use std::time::{Duration, Instant};

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Schedule {
    interval: Duration,
    next_due: Instant,
}

/// A cancellable periodic timer for a single game session.
///
/// The clock does not own a thread. The host loop asks it how long it may
/// block waiting for input ([`GameClock::time_until_due`]) and then whether a
/// tick is due ([`GameClock::poll`]). The host runs the tick to completion
/// before polling again, so ticks never overlap.
#[derive(Debug, Default, Clone)]
pub struct GameClock {
    schedule: Option<Schedule>,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the clock. The first tick is due one `interval` after `now`.
    /// Any previous schedule is replaced.
    pub fn start(&mut self, interval: Duration, now: Instant) {
        trace!("clock armed at {interval:?}");
        self.schedule = Some(Schedule {
            interval,
            next_due: now + interval,
        });
    }

    /// Disarm the clock. Safe to call when it was never started.
    pub fn stop(&mut self) {
        if self.schedule.take().is_some() {
            trace!("clock stopped");
        }
    }

    pub fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.stop();
        self.start(interval, now);
    }

    pub fn is_armed(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.schedule.map(|s| s.interval)
    }

    /// `None` when disarmed; the host may then block on input indefinitely.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.schedule.map(|s| s.next_due.saturating_duration_since(now))
    }

    /// Returns `true` when one tick is due, and moves the deadline forward.
    /// Ticks missed while the host was busy are dropped, not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(schedule) = self.schedule.as_mut() else {
            return false;
        };
        if now < schedule.next_due {
            return false;
        }
        schedule.next_due += schedule.interval;
        if schedule.next_due <= now {
            schedule.next_due = now + schedule.interval;
        }
        true
    }
}
