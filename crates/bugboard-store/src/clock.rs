//! Time source for the store.
//!
//! The store reads wall time through [`Clock`] so tests can pin it, and
//! passes every reading through [`advance_past`] so `updatedAt` never
//! repeats or moves backwards, even if the wall clock does.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::sync::Mutex;

/// Source of "now".
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// `now` if it is later than `previous`, otherwise one microsecond past it.
pub fn advance_past(now: DateTime<Utc>, previous: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + TimeDelta::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn advance_past_keeps_later_readings() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 15, 11, 0, 0).unwrap();
        assert_eq!(advance_past(later, earlier), later);
    }

    #[test]
    fn advance_past_bumps_stalled_or_backwards_readings() {
        let previous = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let backwards = Utc.with_ymd_and_hms(2024, 1, 14, 10, 0, 0).unwrap();

        let bumped = advance_past(previous, previous);
        assert!(bumped > previous);
        assert!(advance_past(backwards, previous) > previous);
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(TimeDelta::minutes(5));
        assert_eq!(clock.now(), start + TimeDelta::minutes(5));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
